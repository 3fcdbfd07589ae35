//! PostgreSQL-backed picking store
//!
//! The per-event aggregate is stored as one JSON document in
//! `picking_states`; source tables are owned by the wider platform and only
//! read here. Saving is a whole-document upsert: last write wins, matching
//! the interactive picking flow.

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use shared::{
    Allocation, Elaboration, EventMilestone, ExpeditionType, GastronomicOrder, LotState,
    MeasurementUnit, OrderLine, PickingState, ProductionLot, Recipe, RecipeElaboration,
    TimeWindow,
};

use crate::error::{AppError, AppResult};

use super::PickingStore;

/// Picking store over the platform's PostgreSQL database
#[derive(Clone)]
pub struct PgPickingStore {
    db: PgPool,
}

impl PgPickingStore {
    /// Create a new PgPickingStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Database row for a production lot
#[derive(Debug, sqlx::FromRow)]
struct ProductionLotRow {
    id: Uuid,
    elaboration_id: Uuid,
    elaboration_name: String,
    produced_quantity: Decimal,
    unit: String,
    state: String,
    creation_date: DateTime<Utc>,
    completion_date: Option<DateTime<Utc>>,
}

impl TryFrom<ProductionLotRow> for ProductionLot {
    type Error = AppError;

    fn try_from(row: ProductionLotRow) -> Result<Self, Self::Error> {
        let unit = MeasurementUnit::from_str(&row.unit)
            .ok_or_else(|| AppError::Internal(anyhow!("unknown measurement unit: {}", row.unit)))?;
        let state = LotState::from_str(&row.state)
            .ok_or_else(|| AppError::Internal(anyhow!("unknown lot state: {}", row.state)))?;

        Ok(ProductionLot {
            id: row.id,
            elaboration_id: row.elaboration_id,
            elaboration_name: row.elaboration_name,
            produced_quantity: row.produced_quantity,
            unit,
            state,
            creation_date: row.creation_date,
            completion_date: row.completion_date,
        })
    }
}

/// Database row for an elaboration
#[derive(Debug, sqlx::FromRow)]
struct ElaborationRow {
    id: Uuid,
    name: String,
    production_unit: String,
    expedition_type: String,
}

impl TryFrom<ElaborationRow> for Elaboration {
    type Error = AppError;

    fn try_from(row: ElaborationRow) -> Result<Self, Self::Error> {
        let production_unit = MeasurementUnit::from_str(&row.production_unit).ok_or_else(|| {
            AppError::Internal(anyhow!("unknown measurement unit: {}", row.production_unit))
        })?;
        let expedition_type = ExpeditionType::from_str(&row.expedition_type).ok_or_else(|| {
            AppError::Internal(anyhow!("unknown expedition type: {}", row.expedition_type))
        })?;

        Ok(Elaboration {
            id: row.id,
            name: row.name,
            production_unit,
            expedition_type,
        })
    }
}

/// Database row for an event milestone
#[derive(Debug, sqlx::FromRow)]
struct MilestoneRow {
    id: Uuid,
    event_id: Uuid,
    date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    requires_catering: bool,
    location: Option<String>,
}

impl From<MilestoneRow> for EventMilestone {
    fn from(row: MilestoneRow) -> Self {
        let time_window = match (row.start_time, row.end_time) {
            (Some(start), Some(end)) => Some(TimeWindow::new(start, end)),
            _ => None,
        };
        EventMilestone {
            id: row.id,
            event_id: row.event_id,
            date: row.date,
            time_window,
            requires_catering: row.requires_catering,
            location: row.location,
        }
    }
}

impl PickingStore for PgPickingStore {
    async fn get_picking_state(&self, event_id: Uuid) -> AppResult<Option<PickingState>> {
        let state = sqlx::query_scalar::<_, Json<PickingState>>(
            "SELECT state FROM picking_states WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(state.map(|Json(state)| state))
    }

    async fn save_picking_state(&self, state: &PickingState) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO picking_states (event_id, state, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (event_id)
            DO UPDATE SET state = EXCLUDED.state, updated_at = now()
            "#,
        )
        .bind(state.event_id)
        .bind(Json(state))
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn get_lots(&self) -> AppResult<Vec<ProductionLot>> {
        let rows = sqlx::query_as::<_, ProductionLotRow>(
            r#"
            SELECT id, elaboration_id, elaboration_name, produced_quantity, unit, state,
                   creation_date, completion_date
            FROM production_lots
            ORDER BY creation_date
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ProductionLot::try_from).collect()
    }

    async fn get_elaborations(&self) -> AppResult<Vec<Elaboration>> {
        let rows = sqlx::query_as::<_, ElaborationRow>(
            "SELECT id, name, production_unit, expedition_type FROM elaborations ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Elaboration::try_from).collect()
    }

    async fn get_recipes(&self) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, (Uuid, String, Json<Vec<RecipeElaboration>>)>(
            "SELECT id, name, elaborations FROM recipes ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, Json(elaborations))| Recipe {
                id,
                name,
                elaborations,
            })
            .collect())
    }

    async fn get_event_milestones(&self, event_id: Uuid) -> AppResult<Vec<EventMilestone>> {
        let rows = sqlx::query_as::<_, MilestoneRow>(
            r#"
            SELECT id, event_id, date, start_time, end_time, requires_catering, location
            FROM event_milestones
            WHERE event_id = $1
            ORDER BY date, start_time
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(EventMilestone::from).collect())
    }

    async fn get_orders_for_milestones(
        &self,
        milestone_ids: &[Uuid],
    ) -> AppResult<Vec<GastronomicOrder>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, Json<Vec<OrderLine>>)>(
            r#"
            SELECT id, milestone_id, lines
            FROM gastronomic_orders
            WHERE milestone_id = ANY($1)
            ORDER BY created_at
            "#,
        )
        .bind(milestone_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, milestone_id, Json(lines))| GastronomicOrder {
                id,
                milestone_id,
                lines,
            })
            .collect())
    }

    async fn get_allocations_across_events(&self) -> AppResult<Vec<Allocation>> {
        let states =
            sqlx::query_scalar::<_, Json<PickingState>>("SELECT state FROM picking_states")
                .fetch_all(&self.db)
                .await?;

        Ok(states
            .into_iter()
            .flat_map(|Json(state)| state.allocations)
            .collect())
    }
}
