//! SurrealDB implementation of [`QaRepository`].

use std::collections::HashMap;

use bazaar_core::error::BazaarResult;
use bazaar_core::models::qa::{
    Answer, CreateAnswer, CreateQuestion, Question, QuestionWithAnswers,
};
use bazaar_core::repository::QaRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct QuestionRow {
    product_id: String,
    user_id: String,
    question: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct QuestionRowWithId {
    record_id: String,
    product_id: String,
    user_id: String,
    question: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AnswerRow {
    question_id: String,
    vendor_id: String,
    answer: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AnswerRowWithId {
    record_id: String,
    question_id: String,
    vendor_id: String,
    answer: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Migration(format!("invalid {what} UUID: {e}")))
}

impl QuestionRow {
    fn into_question(self, id: Uuid) -> Result<Question, DbError> {
        Ok(Question {
            id,
            product_id: parse_uuid(&self.product_id, "product")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            question: self.question,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl QuestionRowWithId {
    fn try_into_question(self) -> Result<Question, DbError> {
        let id = parse_uuid(&self.record_id, "question")?;
        Ok(Question {
            id,
            product_id: parse_uuid(&self.product_id, "product")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            question: self.question,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AnswerRow {
    fn into_answer(self, id: Uuid) -> Result<Answer, DbError> {
        Ok(Answer {
            id,
            question_id: parse_uuid(&self.question_id, "question")?,
            vendor_id: parse_uuid(&self.vendor_id, "vendor")?,
            answer: self.answer,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AnswerRowWithId {
    fn try_into_answer(self) -> Result<Answer, DbError> {
        let id = parse_uuid(&self.record_id, "answer")?;
        Ok(Answer {
            id,
            question_id: parse_uuid(&self.question_id, "question")?,
            vendor_id: parse_uuid(&self.vendor_id, "vendor")?,
            answer: self.answer,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Q&A repository.
#[derive(Clone)]
pub struct SurrealQaRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealQaRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> QaRepository for SurrealQaRepository<C> {
    async fn create_question(&self, input: CreateQuestion) -> BazaarResult<Question> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "CREATE type::record('product_question', $id) SET \
                 product_id = $product_id, \
                 user_id = $user_id, \
                 question = $question",
            )
            .bind(("id", id_str.clone()))
            .bind(("product_id", input.product_id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("question", input.question))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<QuestionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "question".into(),
            id: id_str,
        })?;

        Ok(row.into_question(id)?)
    }

    async fn get_question(&self, id: Uuid) -> BazaarResult<Question> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('product_question', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<QuestionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "question".into(),
            id: id_str,
        })?;

        Ok(row.into_question(id)?)
    }

    async fn create_answer(&self, input: CreateAnswer) -> BazaarResult<Answer> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('product_answer', $id) SET \
                 question_id = $question_id, \
                 vendor_id = $vendor_id, \
                 answer = $answer",
            )
            .bind(("id", id_str.clone()))
            .bind(("question_id", input.question_id.to_string()))
            .bind(("vendor_id", input.vendor_id.to_string()))
            .bind(("answer", input.answer))
            .await
            .map_err(DbError::from)?;

        // One answer per question per vendor, enforced by the unique
        // index.
        let mut result = result
            .check()
            .map_err(|e| DbError::conflict_or_surreal(e, "answer"))?;

        let rows: Vec<AnswerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "answer".into(),
            id: id_str,
        })?;

        Ok(row.into_answer(id)?)
    }

    async fn list_answers(&self, question_id: Uuid) -> BazaarResult<Vec<Answer>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM product_answer \
                 WHERE question_id = $question_id \
                 ORDER BY created_at ASC",
            )
            .bind(("question_id", question_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AnswerRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_answer())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn list_by_product(&self, product_id: Uuid) -> BazaarResult<Vec<QuestionWithAnswers>> {
        let product_id_str = product_id.to_string();

        // Questions newest first, then all their answers in one
        // query, grouped in memory.
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM product_question \
                 WHERE product_id = $product_id \
                 ORDER BY created_at DESC; \
                 SELECT meta::id(id) AS record_id, * \
                 FROM product_answer \
                 WHERE question_id IN \
                     (SELECT VALUE meta::id(id) FROM product_question \
                      WHERE product_id = $product_id) \
                 ORDER BY created_at ASC",
            )
            .bind(("product_id", product_id_str))
            .await
            .map_err(DbError::from)?;

        let question_rows: Vec<QuestionRowWithId> = result.take(0).map_err(DbError::from)?;
        let answer_rows: Vec<AnswerRowWithId> = result.take(1).map_err(DbError::from)?;

        let mut answers_by_question: HashMap<Uuid, Vec<Answer>> = HashMap::new();
        for row in answer_rows {
            let answer = row.try_into_answer()?;
            answers_by_question
                .entry(answer.question_id)
                .or_default()
                .push(answer);
        }

        question_rows
            .into_iter()
            .map(|row| {
                let question = row.try_into_question()?;
                let answers = answers_by_question.remove(&question.id).unwrap_or_default();
                Ok(QuestionWithAnswers { question, answers })
            })
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}
