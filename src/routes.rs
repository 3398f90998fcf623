//! HTTP routes. Each request reads the whole group document, runs the
//! engine over it, and appends only what the engine accepted.

use actix_web::{delete, get, post, put, web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::exchange::pairwise_debts;
use crate::ledger::Ledger;
use crate::member::Roster;
use crate::schemas::{Expense, Group, Settlement};
use crate::store::GroupStore;
use crate::summary::{quick_split, GroupExport, GroupSummary, Presentation};

#[derive(Deserialize, Serialize)]
struct NewGroupJson {
    name: String,
    members: Vec<String>,
}

#[derive(Deserialize, Serialize)]
struct SplitJson {
    amount: Decimal,
    names: Vec<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "malformed request body");
        ApiError::InvalidRequest(err.to_string()).into()
    }))
    .service(list_groups)
    .service(add_group)
    .service(get_group)
    .service(delete_group)
    .service(add_expense)
    .service(add_settlement)
    .service(get_balance)
    .service(get_suggested_settlements)
    .service(get_debts)
    .service(get_summary)
    .service(export_group)
    .service(split_bill);
}

async fn load(store: &dyn GroupStore, id: &str) -> Result<(Group, Ledger), ApiError> {
    let group = store.find(id).await?;
    let ledger = Ledger::from_group(&group).map_err(|source| {
        warn!(group = %id, error = %source, "stored group does not form a valid ledger");
        ApiError::InvalidStoredGroup {
            id: id.to_string(),
            source,
        }
    })?;
    Ok((group, ledger))
}

#[get("/groups")]
async fn list_groups(store: web::Data<dyn GroupStore>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(store.list().await?))
}

#[put("/groups/{id}")]
async fn add_group(
    store: web::Data<dyn GroupStore>,
    id: web::Path<String>,
    json: web::Json<NewGroupJson>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let NewGroupJson { name, members } = json.into_inner();
    let name = name.trim().to_string();
    if id.trim().is_empty() || name.is_empty() {
        return Err(ApiError::InvalidRequest(
            "group id and name must not be blank".to_string(),
        ));
    }
    if members.is_empty() {
        return Err(ApiError::InvalidRequest(
            "a group needs at least one member".to_string(),
        ));
    }

    let roster = Roster::new(&members)?;
    let group = Group {
        id,
        name,
        members: roster.names().to_vec(),
        expenses: vec![],
        settlements: vec![],
    };
    store.insert(&group).await?;
    info!(group = %group.id, members = group.members.len(), "group created");
    Ok(HttpResponse::Created().json(group))
}

#[get("/groups/{id}")]
async fn get_group(
    store: web::Data<dyn GroupStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(store.find(&id).await?))
}

#[delete("/groups/{id}")]
async fn delete_group(
    store: web::Data<dyn GroupStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    store.delete(&id).await?;
    info!(group = %id, "group deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[post("/groups/{id}/expenses")]
async fn add_expense(
    store: web::Data<dyn GroupStore>,
    presentation: web::Data<Presentation>,
    id: web::Path<String>,
    expense: web::Json<Expense>,
) -> Result<HttpResponse, ApiError> {
    let (group, mut ledger) = load(store.get_ref(), &id).await?;
    let expense = ledger
        .record_expense(expense.into_inner())
        .inspect_err(|err| warn!(group = %group.id, error = %err, "expense rejected"))?
        .clone();
    store.push_expense(&group.id, &expense).await?;
    info!(group = %group.id, amount = %expense.amount, payer = %expense.payer, "expense recorded");
    Ok(HttpResponse::Created().json(GroupSummary::build(
        &group.id,
        &group.name,
        &ledger,
        &presentation,
    )))
}

#[post("/groups/{id}/settlements")]
async fn add_settlement(
    store: web::Data<dyn GroupStore>,
    presentation: web::Data<Presentation>,
    id: web::Path<String>,
    settlement: web::Json<Settlement>,
) -> Result<HttpResponse, ApiError> {
    let (group, mut ledger) = load(store.get_ref(), &id).await?;
    let settlement = ledger
        .record_settlement(settlement.into_inner())
        .inspect_err(|err| warn!(group = %group.id, error = %err, "settlement rejected"))?
        .clone();
    store.push_settlement(&group.id, &settlement).await?;
    info!(
        group = %group.id,
        from = %settlement.from,
        to = %settlement.to,
        amount = %settlement.amount,
        "settlement recorded"
    );
    Ok(HttpResponse::Created().json(GroupSummary::build(
        &group.id,
        &group.name,
        &ledger,
        &presentation,
    )))
}

#[get("/groups/{id}/balance")]
async fn get_balance(
    store: web::Data<dyn GroupStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let (_, ledger) = load(store.get_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(ledger.balances()))
}

#[get("/groups/{id}/settlements/suggested")]
async fn get_suggested_settlements(
    store: web::Data<dyn GroupStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let (_, ledger) = load(store.get_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(ledger.suggested_transfers()))
}

#[get("/groups/{id}/debts")]
async fn get_debts(
    store: web::Data<dyn GroupStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let (_, ledger) = load(store.get_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(pairwise_debts(&ledger)))
}

#[get("/groups/{id}/summary")]
async fn get_summary(
    store: web::Data<dyn GroupStore>,
    presentation: web::Data<Presentation>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let (group, ledger) = load(store.get_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(GroupSummary::build(
        &group.id,
        &group.name,
        &ledger,
        &presentation,
    )))
}

#[get("/groups/{id}/export")]
async fn export_group(
    store: web::Data<dyn GroupStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let (group, ledger) = load(store.get_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(GroupExport::new(group, &ledger)))
}

#[post("/split")]
async fn split_bill(
    presentation: web::Data<Presentation>,
    json: web::Json<SplitJson>,
) -> Result<HttpResponse, ApiError> {
    let SplitJson { amount, names } = json.into_inner();
    Ok(HttpResponse::Ok().json(quick_split(amount, &names, &presentation)?))
}
