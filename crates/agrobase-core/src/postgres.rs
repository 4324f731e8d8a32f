//! [`TenantStore`] backed by Postgres through sqlx.
//!
//! Each `apply` call is one transaction: a batch lands completely or not at
//! all. Tenant scoping, uniqueness and computed columns are enforced by the
//! schema in `migrations/`.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::company::NewCompany;
use crate::db::DbPool;
use crate::rows::{Batch, Table, ZoneStructureRecord};
use crate::store::{StoreError, TenantStore};

#[derive(Debug, Clone)]
pub struct PgTenantStore {
    pool: DbPool,
}

impl PgTenantStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Zone structures as stored, including the generated `max_positions`.
    pub async fn zone_structures(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<ZoneStructureRecord>, StoreError> {
        let records = sqlx::query_as::<_, ZoneStructureRecord>(
            r#"
            SELECT id, zone_id, code, levels, positions_per_level, max_positions
            FROM zone_structures
            WHERE tenant_id = $1
            ORDER BY code
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

#[async_trait]
impl TenantStore for PgTenantStore {
    async fn count_where(&self, table: Table, tenant_id: Uuid) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE tenant_id = $1");
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(tenant_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| classify(table, err))
    }

    async fn apply(&self, batch: &Batch) -> Result<u64, StoreError> {
        let table = batch.table();
        let mut tx = self.pool.begin().await.map_err(|err| classify(table, err))?;
        let written = write(&mut *tx, batch)
            .await
            .map_err(|err| classify(table, err))?;
        tx.commit().await.map_err(|err| classify(table, err))?;
        Ok(written)
    }

    async fn insert_company(&self, company: &NewCompany) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO companies (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(company.id)
            .bind(&company.name)
            .bind(company.created_at)
            .execute(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                    StoreError::DuplicateCompany(company.id)
                }
                other => StoreError::Database(other),
            })?;
        Ok(())
    }
}

/// Map a driver error onto the store taxonomy by SQLSTATE.
fn classify(table: Table, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some("23505") => StoreError::UniqueViolation {
                table,
                key: db.constraint().unwrap_or_default().to_string(),
            },
            Some("23503") => StoreError::ForeignKey {
                table,
                detail: db.message().to_string(),
            },
            Some("23514") | Some("23502") => StoreError::Constraint {
                table,
                reason: db.message().to_string(),
            },
            _ => StoreError::Database(sqlx::Error::Database(db)),
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Database(other),
    }
}

async fn write(conn: &mut PgConnection, batch: &Batch) -> Result<u64, sqlx::Error> {
    let mut written = 0;

    match batch {
        Batch::Categories(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO resource_categories (id, tenant_id, code, name, kind)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(row.kind.as_str())
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::Units(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO units_of_measure (id, tenant_id, code, name, dimension, to_base_factor)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(row.dimension.as_str())
                .bind(row.to_base_factor)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::ActivityTypes(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO activity_types (id, tenant_id, code, name, description)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(&row.description)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::CropTypes(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO crop_types (id, tenant_id, code, name, scientific_name, lifecycle)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(&row.scientific_name)
                .bind(row.lifecycle.as_str())
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::DocumentTypes(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO regulatory_document_types (id, tenant_id, code, name, issuing_authority, fields)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(&row.issuing_authority)
                .bind(Json(&row.fields))
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::Phases(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO production_phases (id, tenant_id, crop_type_id, code, name, sort_order, default_duration_days)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(row.crop_type_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(row.sort_order)
                .bind(row.default_duration_days)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::Cultivars(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO cultivars (id, tenant_id, crop_type_id, code, name, breeder, expected_yield_per_plant_g, phase_durations)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(row.crop_type_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(&row.breeder)
                .bind(row.expected_yield_per_plant_g)
                .bind(Json(&row.phase_durations))
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::PhaseFlows(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO phase_product_flows (
                        id, tenant_id, cultivar_id, phase_id, direction, role,
                        product_id, category_id, unit_id, expected_yield_pct, sort_order
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(row.cultivar_id)
                .bind(row.phase_id)
                .bind(row.direction.as_str())
                .bind(row.role.as_str())
                .bind(row.item.product_id())
                .bind(row.item.category_id())
                .bind(row.unit_id)
                .bind(row.expected_yield_pct)
                .bind(row.sort_order)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::Templates(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO activity_templates (id, tenant_id, activity_type_id, code, name, estimated_minutes)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(row.activity_type_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(row.estimated_minutes)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::TemplatePhases(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO activity_template_phases (id, tenant_id, template_id, phase_id)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(row.template_id)
                .bind(row.phase_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::TemplateResources(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO activity_template_resources (
                        id, tenant_id, template_id, category_id, product_id, unit_id, quantity, basis
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(row.template_id)
                .bind(row.category_id)
                .bind(row.product_id)
                .bind(row.unit_id)
                .bind(row.quantity)
                .bind(row.basis.as_str())
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::ChecklistSteps(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO activity_template_checklist (
                        id, tenant_id, template_id, step_order, instruction, is_critical, requires_photo
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(row.template_id)
                .bind(row.step_order)
                .bind(&row.instruction)
                .bind(row.is_critical)
                .bind(row.requires_photo)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::Schedules(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO cultivation_schedules (id, tenant_id, cultivar_id, code, name, total_days, phases)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(row.cultivar_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(row.total_days)
                .bind(Json(&row.phases))
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::Requirements(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO regulatory_requirements (
                        id, tenant_id, document_type_id, product_id, category_id, context, is_mandatory
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(row.document_type_id)
                .bind(row.target.product_id())
                .bind(row.target.category_id())
                .bind(row.context.as_str())
                .bind(row.is_mandatory)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::Suppliers(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO suppliers (id, tenant_id, code, name, tax_id, contact_email, country_code)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(&row.tax_id)
                .bind(&row.contact_email)
                .bind(&row.country_code)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::Facilities(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO facilities (id, tenant_id, code, name, facility_type, municipality, area_m2)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(row.facility_type.as_str())
                .bind(&row.municipality)
                .bind(row.area_m2)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::Products(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO products (
                        id, tenant_id, sku, name, category_id, unit_id,
                        cultivar_id, supplier_id, procurement, lot_tracked
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(&row.sku)
                .bind(&row.name)
                .bind(row.category_id)
                .bind(row.unit_id)
                .bind(row.cultivar_id)
                .bind(row.supplier_id)
                .bind(row.procurement.as_str())
                .bind(row.lot_tracked)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::Zones(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO zones (id, tenant_id, facility_id, code, name, purpose, area_m2, climate_controlled)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(row.facility_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(row.purpose.as_str())
                .bind(row.area_m2)
                .bind(row.climate_controlled)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::ZoneStructures(rows) => {
            for row in rows {
                written += sqlx::query(
                    r#"
                    INSERT INTO zone_structures (
                        id, tenant_id, zone_id, code, name, kind,
                        length_m, width_m, levels, positions_per_level
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    "#,
                )
                .bind(row.id)
                .bind(row.tenant_id)
                .bind(row.zone_id)
                .bind(&row.code)
                .bind(&row.name)
                .bind(row.kind.as_str())
                .bind(row.length_m)
                .bind(row.width_m)
                .bind(row.levels)
                .bind(row.positions_per_level)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            }
        }
        Batch::CategoryParents(_) | Batch::UnitBaseUnits(_) | Batch::PhaseDependencies(_) => {
            let table = batch.table();
            for link in batch.links() {
                let sql = format!(
                    "UPDATE {table} SET {column} = $1 WHERE id = $2 AND tenant_id = $3",
                    column = link.column
                );
                let affected = sqlx::query(&sql)
                    .bind(link.target)
                    .bind(link.row_id)
                    .bind(link.tenant_id)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected();
                if affected == 0 {
                    return Err(sqlx::Error::RowNotFound);
                }
                written += affected;
            }
        }
    }

    Ok(written)
}
