use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};
use crate::models::studio::{CreateStudioRequest, Studio, UpdateStudioRequest};
use crate::services::schedules::parse_time_of_day;

pub struct StudioService;

impl StudioService {
    pub async fn list(pool: &PgPool, owner_id: i64) -> ApiResult<Vec<Studio>> {
        let studios = sqlx::query_as::<_, Studio>(
            "SELECT * FROM studios WHERE owner_id = $1 ORDER BY name",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
        Ok(studios)
    }

    pub async fn get(pool: &PgPool, owner_id: i64, id: i64) -> ApiResult<Studio> {
        sqlx::query_as::<_, Studio>("SELECT * FROM studios WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Studio not found".into()))
    }

    pub async fn create(
        pool: &PgPool,
        owner_id: i64,
        req: &CreateStudioRequest,
    ) -> ApiResult<Studio> {
        if req.name.trim().is_empty() {
            return Err(ApiError::Validation("Studio name is required".into()));
        }
        let (opening, closing) = parse_hours(
            req.opening_time.as_deref(),
            req.closing_time.as_deref(),
        )?;

        let studio = sqlx::query_as::<_, Studio>(
            "INSERT INTO studios (owner_id, name, location, opening_time, closing_time, description)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5, COALESCE($6, ''))
             RETURNING *",
        )
        .bind(owner_id)
        .bind(req.name.trim())
        .bind(&req.location)
        .bind(opening)
        .bind(closing)
        .bind(&req.description)
        .fetch_one(pool)
        .await?;
        Ok(studio)
    }

    pub async fn update(
        pool: &PgPool,
        owner_id: i64,
        id: i64,
        req: &UpdateStudioRequest,
    ) -> ApiResult<Studio> {
        let (opening, closing) = parse_hours(
            req.opening_time.as_deref(),
            req.closing_time.as_deref(),
        )?;

        let studio = sqlx::query_as::<_, Studio>(
            "UPDATE studios
             SET name = COALESCE($1, name),
                 location = COALESCE($2, location),
                 opening_time = COALESCE($3, opening_time),
                 closing_time = COALESCE($4, closing_time),
                 description = COALESCE($5, description),
                 updated_at = now()
             WHERE id = $6 AND owner_id = $7
             RETURNING *",
        )
        .bind(&req.name)
        .bind(&req.location)
        .bind(opening)
        .bind(closing)
        .bind(&req.description)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Studio not found".into()))?;
        Ok(studio)
    }
}

fn parse_hours(
    opening: Option<&str>,
    closing: Option<&str>,
) -> ApiResult<(Option<chrono::NaiveTime>, Option<chrono::NaiveTime>)> {
    let opening = opening.map(parse_time_of_day).transpose()?;
    let closing = closing.map(parse_time_of_day).transpose()?;
    if let (Some(open), Some(close)) = (opening, closing) {
        if open >= close {
            return Err(ApiError::Validation(
                "Opening time must be before closing time".into(),
            ));
        }
    }
    Ok((opening, closing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn hours_parse_and_validate_ordering() {
        let (open, close) = parse_hours(Some("06:00"), Some("22:00")).unwrap();
        assert_eq!(open, NaiveTime::from_hms_opt(6, 0, 0));
        assert_eq!(close, NaiveTime::from_hms_opt(22, 0, 0));

        assert!(parse_hours(Some("22:00"), Some("06:00")).is_err());
        assert!(parse_hours(Some("nope"), None).is_err());

        // one-sided hours are allowed
        let (open, close) = parse_hours(Some("06:00"), None).unwrap();
        assert!(open.is_some() && close.is_none());
    }
}
