use crate::rows::{decode_list, encode_list, like_pattern, user_from_row, USER_SELECT};
use chrono::Utc;
use purestream_core::{CoreError, NewUser, Result, UpdateProfile, User, UserId};
use sqlx::{Row, SqlitePool};

/// A user together with the stored bcrypt hash
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Create a user; username and email must be unused
pub async fn create(pool: &SqlitePool, user: NewUser) -> Result<User> {
    if email_or_username_taken(pool, &user.email, &user.username).await? {
        return Err(CoreError::duplicate("Email or username already in use"));
    }

    let id = UserId::generate();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, last_seen, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(now)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| CoreError::storage("Failed to retrieve created user"))
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE u.id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(user_from_row).transpose()
}

/// Look up a user by email along with the password hash (for login)
pub async fn get_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserCredentials>> {
    let sql = format!("{USER_SELECT} WHERE u.email = ?");
    let Some(row) = sqlx::query(&sql).bind(email).fetch_optional(pool).await? else {
        return Ok(None);
    };

    let user = user_from_row(&row)?;
    let password_hash: String = sqlx::query("SELECT password_hash FROM users WHERE id = ?")
        .bind(&user.id)
        .fetch_one(pool)
        .await?
        .try_get("password_hash")?;

    Ok(Some(UserCredentials {
        user,
        password_hash,
    }))
}

/// Whether either the email or the username is already registered
pub async fn email_or_username_taken(
    pool: &SqlitePool,
    email: &str,
    username: &str,
) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM users WHERE email = ? OR username = ?")
        .bind(email)
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(row.try_get::<i64, _>("n")? > 0)
}

/// Whether a username belongs to someone other than `except`
pub async fn username_taken(pool: &SqlitePool, username: &str, except: &UserId) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM users WHERE username = ? AND id != ?")
        .bind(username)
        .bind(except)
        .fetch_one(pool)
        .await?;
    Ok(row.try_get::<i64, _>("n")? > 0)
}

/// Record presence; `last_seen` is stamped either way
pub async fn set_online(pool: &SqlitePool, id: &UserId, online: bool) -> Result<()> {
    let now = Utc::now();
    sqlx::query("UPDATE users SET is_online = ?, last_seen = ?, updated_at = ? WHERE id = ?")
        .bind(i64::from(online))
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Apply a partial profile update
///
/// Username uniqueness is checked here so callers cannot race past it.
pub async fn update_profile(pool: &SqlitePool, id: &UserId, update: UpdateProfile) -> Result<User> {
    let mut tx = pool.begin().await?;

    let current =
        sqlx::query("SELECT username, bio, favorite_genres, profile_picture FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::not_found("User", id.as_str()))?;

    let mut username: String = current.try_get("username")?;
    let mut bio: Option<String> = current.try_get("bio")?;
    let mut genres = decode_list(current.try_get("favorite_genres")?);
    let mut picture: Option<String> = current.try_get("profile_picture")?;

    if let Some(new_name) = update.username.filter(|n| !n.is_empty() && *n != username) {
        let taken = sqlx::query("SELECT COUNT(*) AS n FROM users WHERE username = ?")
            .bind(&new_name)
            .fetch_one(&mut *tx)
            .await?
            .try_get::<i64, _>("n")?
            > 0;
        if taken {
            return Err(CoreError::duplicate("Username is already taken"));
        }
        username = new_name;
    }
    if let Some(new_bio) = update.bio {
        bio = Some(new_bio);
    }
    if let Some(new_genres) = update.favorite_genres {
        genres = new_genres;
    }
    if let Some(new_picture) = update.profile_picture.filter(|p| !p.is_empty()) {
        picture = Some(new_picture);
    }

    sqlx::query(
        r#"
        UPDATE users
        SET username = ?, bio = ?, favorite_genres = ?, profile_picture = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&username)
    .bind(&bio)
    .bind(encode_list(&genres)?)
    .bind(&picture)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", id.as_str()))
}

/// Search username and bio, most-followed first
pub async fn search(
    pool: &SqlitePool,
    query: Option<&str>,
    offset: i64,
    limit: i64,
) -> Result<(Vec<User>, i64)> {
    let pattern = like_pattern(query.unwrap_or_default());

    let sql = format!(
        r#"{USER_SELECT}
        WHERE LOWER(u.username) LIKE ?1 ESCAPE '\' OR LOWER(COALESCE(u.bio, '')) LIKE ?1 ESCAPE '\'
        ORDER BY follower_count DESC, u.created_at DESC
        LIMIT ?2 OFFSET ?3"#
    );
    let rows = sqlx::query(&sql)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    let users = rows.iter().map(user_from_row).collect::<Result<Vec<_>>>()?;

    let total: i64 = sqlx::query(
        r#"
        SELECT COUNT(*) AS n FROM users u
        WHERE LOWER(u.username) LIKE ?1 ESCAPE '\' OR LOWER(COALESCE(u.bio, '')) LIKE ?1 ESCAPE '\'
        "#,
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?
    .try_get("n")?;

    Ok((users, total))
}

/// Follow or unfollow; returns whether `follower` now follows `followee`
pub async fn toggle_follow(pool: &SqlitePool, follower: &UserId, followee: &UserId) -> Result<bool> {
    if follower == followee {
        return Err(CoreError::invalid_input("You cannot follow yourself"));
    }

    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM user_follows WHERE follower_id = ? AND followee_id = ?")
        .bind(follower)
        .bind(followee)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let now_following = if removed == 0 {
        sqlx::query("INSERT INTO user_follows (follower_id, followee_id, created_at) VALUES (?, ?, ?)")
            .bind(follower)
            .bind(followee)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        true
    } else {
        false
    };

    tx.commit().await?;
    Ok(now_following)
}

/// Users that `id` follows
pub async fn following(pool: &SqlitePool, id: &UserId) -> Result<Vec<User>> {
    let sql = format!(
        "{USER_SELECT} INNER JOIN user_follows uf ON uf.followee_id = u.id WHERE uf.follower_id = ? ORDER BY uf.created_at"
    );
    let rows = sqlx::query(&sql).bind(id).fetch_all(pool).await?;
    rows.iter().map(user_from_row).collect()
}

/// Users following `id`
pub async fn followers(pool: &SqlitePool, id: &UserId) -> Result<Vec<User>> {
    let sql = format!(
        "{USER_SELECT} INNER JOIN user_follows uf ON uf.follower_id = u.id WHERE uf.followee_id = ? ORDER BY uf.created_at"
    );
    let rows = sqlx::query(&sql).bind(id).fetch_all(pool).await?;
    rows.iter().map(user_from_row).collect()
}

/// Other users with at least one favourite genre in `genres`
pub async fn sharing_genres(
    pool: &SqlitePool,
    id: &UserId,
    genres: &[String],
    limit: usize,
) -> Result<Vec<User>> {
    if genres.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!("{USER_SELECT} WHERE u.id != ? ORDER BY u.created_at");
    let rows = sqlx::query(&sql).bind(id).fetch_all(pool).await?;

    let mut matches = Vec::new();
    for row in &rows {
        let user = user_from_row(row)?;
        if user.favorite_genres.iter().any(|g| genres.contains(g)) {
            matches.push(user);
            if matches.len() == limit {
                break;
            }
        }
    }
    Ok(matches)
}

/// All users, oldest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY u.created_at");
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(user_from_row).collect()
}
