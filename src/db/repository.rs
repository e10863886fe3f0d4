use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{ClassRoutine, FullSchoolRoutine, Note, WeeklySchedule};

pub async fn list_classes(db: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT class_name FROM routines ORDER BY rowid")
        .fetch_all(db)
        .await
}

pub async fn class_exists(db: &SqlitePool, class_name: &str) -> Result<bool, sqlx::Error> {
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM routines WHERE class_name = ?")
        .bind(class_name)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

pub async fn fetch_class_routine(
    db: &SqlitePool,
    class_name: &str,
) -> Result<Option<ClassRoutine>, AppError> {
    let row = sqlx::query_as::<_, (String, String, i64)>(
        "SELECT class_name, schedule, revision FROM routines WHERE class_name = ?",
    )
    .bind(class_name)
    .fetch_optional(db)
    .await?;

    let Some((class_name, schedule, revision)) = row else {
        return Ok(None);
    };

    Ok(Some(ClassRoutine {
        class_name,
        schedule: serde_json::from_str(&schedule)?,
        revision,
    }))
}

pub async fn fetch_full_routine(db: &SqlitePool) -> Result<FullSchoolRoutine, AppError> {
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT class_name, schedule FROM routines ORDER BY rowid",
    )
    .fetch_all(db)
    .await?;

    let mut routine = FullSchoolRoutine::new();
    for (class_name, schedule) in rows {
        routine.insert(class_name, serde_json::from_str(&schedule)?);
    }
    Ok(routine)
}

/// Replaces the class routine wholesale and bumps its revision. Last save wins.
pub async fn save_routine(
    db: &SqlitePool,
    class_name: &str,
    schedule: &WeeklySchedule,
) -> Result<ClassRoutine, AppError> {
    let json = serde_json::to_string(schedule)?;
    let now = Utc::now().to_rfc3339();

    let revision = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO routines (class_name, schedule, revision, updated_at)
        VALUES (?1, ?2, 1, ?3)
        ON CONFLICT(class_name) DO UPDATE SET
            schedule = excluded.schedule,
            revision = routines.revision + 1,
            updated_at = excluded.updated_at
        RETURNING revision
        "#,
    )
    .bind(class_name)
    .bind(&json)
    .bind(&now)
    .fetch_one(db)
    .await?;

    Ok(ClassRoutine {
        class_name: class_name.to_string(),
        schedule: schedule.clone(),
        revision,
    })
}

pub async fn fetch_notes(db: &SqlitePool) -> Result<Vec<Note>, sqlx::Error> {
    sqlx::query_as::<_, Note>(
        "SELECT id, content, author, created_at AS timestamp FROM notes ORDER BY seq",
    )
    .fetch_all(db)
    .await
}

pub async fn insert_note(db: &SqlitePool, content: &str, author: &str) -> Result<Note, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO notes (id, content, author, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(&id)
        .bind(content)
        .bind(author)
        .bind(&now)
        .execute(db)
        .await?;

    Ok(Note {
        id,
        content: content.to_string(),
        author: author.to_string(),
        timestamp: now,
    })
}

pub async fn update_note(db: &SqlitePool, id: &str, content: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE notes SET content = ?1 WHERE id = ?2")
        .bind(content)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_note(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notes WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_notepad(db: &SqlitePool, username: &str) -> Result<String, sqlx::Error> {
    let content = sqlx::query_scalar::<_, String>("SELECT content FROM notepads WHERE username = ?")
        .bind(username)
        .fetch_optional(db)
        .await?;
    Ok(content.unwrap_or_default())
}

pub async fn save_notepad(db: &SqlitePool, username: &str, content: &str) -> Result<(), sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO notepads (username, content, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(username) DO UPDATE SET
            content = excluded.content,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(username)
    .bind(content)
    .bind(&now)
    .execute(db)
    .await?;
    Ok(())
}
