//! PostgreSQL Store Implementation

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, SqueakId};
use platform::password::HashedPassword;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::domain::entity::{Account, AccountFeed, NewAccount, Squeak};
use crate::domain::repository::{DuplicateFields, SqueakStore};
use crate::domain::value_object::{email::Email, username::Username};
use crate::error::{SqueakError, SqueakResult};

/// Bootstrap DDL (idempotent)
const SCHEMA: &str = include_str!("schema.sql");

/// Unique constraint names, see `schema.sql`
const USERNAME_CONSTRAINT: &str = "accounts_username_key";
const EMAIL_CONSTRAINT: &str = "accounts_email_key";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgSqueakStore {
    pool: PgPool,
}

impl PgSqueakStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with a bounded pool and check the database answers
    pub async fn connect(database_url: &str, max_connections: u32) -> SqueakResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self::new(pool))
    }

    /// Create tables and indexes if missing
    pub async fn ensure_schema(&self) -> SqueakResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("Schema ensured");
        Ok(())
    }

    /// Drop everything `ensure_schema` creates
    pub async fn drop_schema(&self) -> SqueakResult<()> {
        sqlx::raw_sql("DROP TABLE IF EXISTS squeaks; DROP TABLE IF EXISTS accounts;")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Map a unique violation to the field(s) it is about
fn duplicate_fields(err: &sqlx::Error) -> Option<DuplicateFields> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if db_err.code().as_deref() != Some("23505") {
        return None;
    }

    match db_err.constraint() {
        Some(USERNAME_CONSTRAINT) => Some(DuplicateFields {
            username: true,
            email: false,
        }),
        Some(EMAIL_CONSTRAINT) => Some(DuplicateFields {
            username: false,
            email: true,
        }),
        _ => None,
    }
}

const CONFLICTS_QUERY: &str = r#"
    SELECT
        EXISTS(SELECT 1 FROM accounts WHERE username = $1),
        EXISTS(SELECT 1 FROM accounts WHERE email = $2)
"#;

// ============================================================================
// Store Implementation
// ============================================================================

impl SqueakStore for PgSqueakStore {
    async fn create_account(&self, account: NewAccount) -> SqueakResult<AccountId> {
        let mut tx = self.pool.begin().await?;

        let (username_taken, email_taken) = sqlx::query_as::<_, (bool, bool)>(CONFLICTS_QUERY)
            .bind(account.username.as_str())
            .bind(account.email.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let conflicts = DuplicateFields {
            username: username_taken,
            email: email_taken,
        };
        if conflicts.any() {
            return Err(SqueakError::Duplicate(conflicts));
        }

        // A concurrent insert can still win between check and insert;
        // the unique constraints catch that.
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .fetch_one(&mut *tx)
        .await;

        let id = match inserted {
            Ok(id) => id,
            Err(e) => {
                let Some(violated) = duplicate_fields(&e) else {
                    return Err(SqueakError::Database(e));
                };
                // Postgres reports only the first violated constraint;
                // the winner has committed, so recheck both fields.
                tx.rollback().await?;
                let rechecked = self.find_conflicts(&account.username, &account.email).await?;
                return Err(SqueakError::Duplicate(violated.union(rechecked)));
            }
        };

        tx.commit().await?;

        Ok(AccountId::new(id))
    }

    async fn find_conflicts(
        &self,
        username: &Username,
        email: &Email,
    ) -> SqueakResult<DuplicateFields> {
        let (username, email) = sqlx::query_as::<_, (bool, bool)>(CONFLICTS_QUERY)
            .bind(username.as_str())
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(DuplicateFields { username, email })
    }

    async fn find_by_username(&self, username: &Username) -> SqueakResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> SqueakResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn append_squeak(&self, author: &Username, text: &str) -> SqueakResult<u64> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes appends per author until commit
        let account_id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM accounts WHERE username = $1 FOR UPDATE",
        )
        .bind(author.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SqueakError::AccountNotFound)?;

        sqlx::query("INSERT INTO squeaks (account_id, text) VALUES ($1, $2)")
            .bind(account_id)
            .bind(text)
            .execute(&mut *tx)
            .await?;

        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM squeaks WHERE account_id = $1")
                .bind(account_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(count as u64)
    }

    async fn list_squeaks(&self, author: &Username) -> SqueakResult<Vec<Squeak>> {
        // LEFT JOIN: no rows = unknown author, one all-NULL row = no squeaks yet
        let rows = sqlx::query_as::<_, SqueakRow>(
            r#"
            SELECT s.id AS squeak_id, s.text, s.created_at
            FROM accounts a
            LEFT JOIN squeaks s ON s.account_id = a.id
            WHERE a.username = $1
            ORDER BY s.id
            "#,
        )
        .bind(author.as_str())
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Err(SqueakError::AccountNotFound);
        }

        Ok(rows.into_iter().filter_map(SqueakRow::into_squeak).collect())
    }

    async fn list_accounts_with_squeaks(&self) -> SqueakResult<Vec<AccountFeed>> {
        let rows = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT
                a.id,
                a.username,
                a.email,
                a.password_hash,
                a.created_at,
                s.id AS squeak_id,
                s.text,
                s.created_at AS squeak_created_at
            FROM accounts a
            LEFT JOIN squeaks s ON s.account_id = a.id
            ORDER BY a.id, s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut feeds: Vec<AccountFeed> = Vec::new();
        for row in rows {
            let squeak = SqueakRow {
                squeak_id: row.squeak_id,
                text: row.text,
                created_at: row.squeak_created_at,
            }
            .into_squeak();

            let same_account = feeds
                .last()
                .is_some_and(|feed| feed.account.id.get() == row.account.id);
            if !same_account {
                feeds.push(AccountFeed {
                    account: row.account.into_account()?,
                    squeaks: Vec::new(),
                });
            }

            if let (Some(squeak), Some(feed)) = (squeak, feeds.last_mut()) {
                feed.squeaks.push(squeak);
            }
        }

        Ok(feeds)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> SqueakResult<Account> {
        Ok(Account {
            id: AccountId::new(self.id),
            username: Username::from_db(self.username),
            email: Email::from_db(self.email),
            password_hash: HashedPassword::from_phc_string(self.password_hash)?,
            created_at: self.created_at,
        })
    }
}

/// Squeak columns from a LEFT JOIN; all NULL when the account has none
#[derive(sqlx::FromRow)]
struct SqueakRow {
    squeak_id: Option<i64>,
    text: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl SqueakRow {
    fn into_squeak(self) -> Option<Squeak> {
        Some(Squeak {
            id: SqueakId::new(self.squeak_id?),
            text: self.text?,
            created_at: self.created_at?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FeedRow {
    #[sqlx(flatten)]
    account: AccountRow,
    squeak_id: Option<i64>,
    text: Option<String>,
    squeak_created_at: Option<DateTime<Utc>>,
}
