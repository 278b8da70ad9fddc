use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router
};
use serde::Deserialize;
use tower_http::limit::RequestBodyLimitLayer;

use realty_ledger::{Amount, Expense, ExpenseKind, LedgerRecord, PersistenceAdapter, Summary, UserName,
    expense::parse_date};

use crate::error::ServerError;

const MAX_BODY_BYTES: usize = 1024 * 1024;

type Reply<T> = Result<T, ServerError>;

pub(crate) fn router(adapter: PersistenceAdapter) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ledgers/:user", get(get_record).put(put_record))
        .route("/ledgers/:user/expenses", get(list_expenses).post(add_expense).delete(clear_expenses))
        .route("/ledgers/:user/summary", get(summary))
        .route("/ledgers/:user/export.csv", get(export_csv))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(adapter)
}

/// Store calls block on disk or network, keep them off the async workers.
async fn blocking<T, F>(work: F) -> Reply<T>
where
    F: FnOnce() -> Reply<T> + Send + 'static,
    T: Send + 'static
{
    tokio::task::spawn_blocking(work).await?
}

fn parse_user(raw: &str) -> Reply<UserName> {
    Ok(UserName::parse(raw)?)
}

#[derive(Debug, Deserialize)]
struct NewExpense {
    amount: Amount,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    description: Option<String>
}

impl NewExpense {
    fn into_expense(self) -> Reply<Expense> {
        let date = match &self.date {
            Some(raw) => parse_date(raw)?,
            None => chrono::Local::now().date_naive()
        };
        let kind = ExpenseKind::from_label(self.kind.as_deref().unwrap_or_default());
        Ok(Expense::new(date, kind, self.amount, self.description.as_deref())?)
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn get_record(State(adapter): State<PersistenceAdapter>, Path(user): Path<String>) -> Reply<Json<LedgerRecord>> {
    let user = parse_user(&user)?;
    let record = blocking(move || Ok(adapter.load(&user)?)).await?;
    Ok(Json(record))
}

async fn put_record(
    State(adapter): State<PersistenceAdapter>,
    Path(user): Path<String>,
    Json(record): Json<LedgerRecord>
) -> Reply<StatusCode> {
    let user = parse_user(&user)?;
    blocking(move || Ok(adapter.save(&user, &record)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_expenses(State(adapter): State<PersistenceAdapter>, Path(user): Path<String>) -> Reply<Json<Vec<Expense>>> {
    let user = parse_user(&user)?;
    let ledger = blocking(move || Ok(adapter.load_ledger(&user)?)).await?;
    Ok(Json(ledger.expenses().to_vec()))
}

async fn add_expense(
    State(adapter): State<PersistenceAdapter>,
    Path(user): Path<String>,
    Json(new): Json<NewExpense>
) -> Reply<(StatusCode, Json<Expense>)> {
    let user = parse_user(&user)?;
    let expense = new.into_expense()?;

    let stored = blocking(move || {
        let mut ledger = adapter.load_ledger(&user)?;
        let stored = ledger.add_expense(expense)?.clone();
        adapter.save_ledger(&user, &ledger)?;
        Ok(stored)
    }).await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

async fn clear_expenses(State(adapter): State<PersistenceAdapter>, Path(user): Path<String>) -> Reply<StatusCode> {
    let user = parse_user(&user)?;
    blocking(move || {
        let mut ledger = adapter.load_ledger(&user)?;
        ledger.clear();
        Ok(adapter.save_ledger(&user, &ledger)?)
    }).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn summary(State(adapter): State<PersistenceAdapter>, Path(user): Path<String>) -> Reply<Json<Summary>> {
    let user = parse_user(&user)?;
    let ledger = blocking(move || Ok(adapter.load_ledger(&user)?)).await?;
    Ok(Json(ledger.summary()))
}

async fn export_csv(State(adapter): State<PersistenceAdapter>, Path(user): Path<String>) -> Reply<impl IntoResponse> {
    let user = parse_user(&user)?;
    let ledger = blocking(move || Ok(adapter.load_ledger(&user)?)).await?;

    let disposition = format!("attachment; filename=\"realty_expenses_{}.csv\"",
        chrono::Local::now().format("%Y%m%d"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition)
        ],
        ledger.to_csv()
    ))
}
