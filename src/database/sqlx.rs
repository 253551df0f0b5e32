use crate::core::models::{
    ballot::{CandidateCount, Insert as BallotInsert, Query as BallotQuery},
    candidate::{Candidate, Insert as CandidateInsert, Query as CandidateQuery},
    category::{Category, Insert as CategoryInsert, Update as CategoryUpdate},
    code::{Insert as CodeInsert, Query as CodeQuery, VotingCode},
    common::Pagination,
    user::{Insert as UserInsert, User},
};
use crate::core::ports::repository::{BallotCommon, CandidateCommon, CategoryCommon, CodeCommon, Common, Manager, Store, TxStore, UserCommon};
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};

const CODE_COLUMNS: &str = "id, code, used, expires_at";

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

fn push_code_filters(stmt: &mut QueryBuilder<Postgres>, query: &CodeQuery) {
    stmt.push(" WHERE 1 = 1");
    if let Some(used) = query.used_eq {
        stmt.push(" AND used = ").push_bind(used);
    }
    if let Some(like) = &query.code_like {
        stmt.push(" AND code ILIKE ").push_bind(format!("%{}%", like.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")));
    }
}

impl<E> CodeCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: CodeInsert) -> Result<Option<VotingCode>, Error> {
        let code = query_as(&format!(
            "INSERT INTO voting_codes (code, expires_at) VALUES ($1, $2) ON CONFLICT (code) DO NOTHING RETURNING {}",
            CODE_COLUMNS
        ))
        .bind(data.code)
        .bind(data.expires_at)
        .fetch_optional(&mut self.executor)
        .await?;
        Ok(code)
    }

    async fn get(&mut self, id: i32) -> Result<Option<VotingCode>, Error> {
        let code = query_as(&format!("SELECT {} FROM voting_codes WHERE id = $1", CODE_COLUMNS))
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(code)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<VotingCode>, Error> {
        let code = query_as(&format!("SELECT {} FROM voting_codes WHERE id = $1 FOR UPDATE", CODE_COLUMNS))
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(code)
    }

    async fn get_by_code(&mut self, code: &str) -> Result<Option<VotingCode>, Error> {
        let code = query_as(&format!("SELECT {} FROM voting_codes WHERE code = $1", CODE_COLUMNS))
            .bind(code)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(code)
    }

    async fn mark_used(&mut self, id: i32) -> Result<(), Error> {
        query("UPDATE voting_codes SET used = TRUE WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn query(&mut self, query: &CodeQuery, pagination: Option<Pagination>) -> Result<Vec<VotingCode>, Error> {
        let mut stmt = QueryBuilder::new(format!("SELECT {} FROM voting_codes", CODE_COLUMNS));
        push_code_filters(&mut stmt, query);
        stmt.push(" ORDER BY id");
        if let Some(p) = pagination {
            stmt.push(" LIMIT ").push_bind(p.limit);
            stmt.push(" OFFSET ").push_bind(p.offset);
        }
        let codes = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(codes)
    }

    async fn count(&mut self, query: &CodeQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM voting_codes");
        push_code_filters(&mut stmt, query);
        let (n,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }
}

impl<E> CategoryCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: CategoryInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING id")
            .bind(data.name)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn update(&mut self, id: i32, data: CategoryUpdate) -> Result<bool, Error> {
        let res = query("UPDATE categories SET name = $1 WHERE id = $2")
            .bind(data.name)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        let res = query("DELETE FROM categories WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected() > 0)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Category>, Error> {
        let category = query_as("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(category)
    }

    async fn all(&mut self) -> Result<Vec<Category>, Error> {
        let categories = query_as("SELECT id, name FROM categories ORDER BY id").fetch_all(&mut self.executor).await?;
        Ok(categories)
    }
}

impl<E> CandidateCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: CandidateInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO candidates (name, category_id) VALUES ($1, $2) RETURNING id")
            .bind(data.name)
            .bind(data.category_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        let res = query("DELETE FROM candidates WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected() > 0)
    }

    async fn query(&mut self, query: &CandidateQuery) -> Result<Vec<Candidate>, Error> {
        let mut stmt = QueryBuilder::new("SELECT id, name, category_id FROM candidates WHERE 1 = 1");
        if let Some(category_id) = query.category_id_eq {
            stmt.push(" AND category_id = ").push_bind(category_id);
        }
        stmt.push(" ORDER BY id");
        let candidates = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(candidates)
    }
}

impl<E> BallotCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn bulk_insert(&mut self, ballots: Vec<BallotInsert>) -> Result<(), Error> {
        if ballots.is_empty() {
            return Ok(());
        }
        QueryBuilder::new("INSERT INTO ballots (voting_code_id, candidate_id, cast_at)")
            .push_values(ballots, |mut b, ballot| {
                b.push_bind(ballot.voting_code_id);
                b.push_bind(ballot.candidate_id);
                b.push_bind(ballot.cast_at);
            })
            .build()
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn exists_for_code(&mut self, voting_code_id: i32) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT * FROM ballots WHERE voting_code_id = $1)")
            .bind(voting_code_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn count(&mut self, query: &BallotQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM ballots WHERE 1 = 1");
        if let Some(code_id) = query.voting_code_id_eq {
            stmt.push(" AND voting_code_id = ").push_bind(code_id);
        }
        if let Some(candidate_id) = query.candidate_id_eq {
            stmt.push(" AND candidate_id = ").push_bind(candidate_id);
        }
        let (n,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }

    async fn count_by_candidate(&mut self) -> Result<Vec<CandidateCount>, Error> {
        let counts = query_as("SELECT candidate_id, COUNT(*) AS votes FROM ballots GROUP BY candidate_id")
            .fetch_all(&mut self.executor)
            .await?;
        Ok(counts)
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get_by_username(&mut self, username: &str) -> Result<Option<User>, Error> {
        let user = query_as("SELECT id, username, password, salt FROM admins WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(user)
    }

    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO admins (username, password, salt) VALUES ($1, $2, $3) RETURNING id")
            .bind(user.username)
            .bind(user.password)
            .bind(user.salt)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl Common for PgSqlx<Transaction<'static, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl Store for PgSqlx<Transaction<'static, Postgres>> {}

impl TxStore for PgSqlx<Transaction<'static, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Manager for PgSqlxManager {
    type Store = PgSqlx<PoolConnection<Postgres>>;
    type TxStore = PgSqlx<Transaction<'static, Postgres>>;

    async fn db(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }
}
