use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};
use crate::models::faq::{ChatbotFaq, CreateFaqRequest, UpdateFaqRequest};

pub struct FaqService;

impl FaqService {
    pub async fn list(pool: &PgPool, owner_id: i64) -> ApiResult<Vec<ChatbotFaq>> {
        let faqs = sqlx::query_as::<_, ChatbotFaq>(
            "SELECT * FROM chatbot_faqs WHERE owner_id = $1 ORDER BY studio_id, sort_order, id",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
        Ok(faqs)
    }

    pub async fn create(
        pool: &PgPool,
        owner_id: i64,
        req: &CreateFaqRequest,
    ) -> ApiResult<ChatbotFaq> {
        if req.question.trim().is_empty() || req.answer.trim().is_empty() {
            return Err(ApiError::Validation(
                "Both question and answer are required".into(),
            ));
        }

        // The studio must belong to the caller; a foreign studio id in the
        // body is a not-found, not a silent insert.
        let owns: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM studios WHERE id = $1 AND owner_id = $2",
        )
        .bind(req.studio_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
        if owns.is_none() {
            return Err(ApiError::NotFound("Studio not found".into()));
        }

        let faq = sqlx::query_as::<_, ChatbotFaq>(
            "INSERT INTO chatbot_faqs (owner_id, studio_id, question, answer, is_active, sort_order)
             VALUES ($1, $2, $3, $4, COALESCE($5, TRUE), COALESCE($6, 0))
             RETURNING *",
        )
        .bind(owner_id)
        .bind(req.studio_id)
        .bind(req.question.trim())
        .bind(req.answer.trim())
        .bind(req.is_active)
        .bind(req.sort_order)
        .fetch_one(pool)
        .await?;
        Ok(faq)
    }

    pub async fn update(
        pool: &PgPool,
        owner_id: i64,
        id: i64,
        req: &UpdateFaqRequest,
    ) -> ApiResult<ChatbotFaq> {
        let faq = sqlx::query_as::<_, ChatbotFaq>(
            "UPDATE chatbot_faqs
             SET question = COALESCE($1, question),
                 answer = COALESCE($2, answer),
                 is_active = COALESCE($3, is_active),
                 sort_order = COALESCE($4, sort_order),
                 updated_at = now()
             WHERE id = $5 AND owner_id = $6
             RETURNING *",
        )
        .bind(&req.question)
        .bind(&req.answer)
        .bind(req.is_active)
        .bind(req.sort_order)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("FAQ not found".into()))?;
        Ok(faq)
    }

    pub async fn delete(pool: &PgPool, owner_id: i64, id: i64) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM chatbot_faqs WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("FAQ not found".into()));
        }
        Ok(())
    }
}
