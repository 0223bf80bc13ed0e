// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL migration files are compiled into the binary at build time via
//! `embed_migrations!`. Migrations run automatically on database open.

use taller_core::TallerError;
use tracing::debug;

use crate::database::map_tr_err;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations on the connection's background thread.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history` table.
pub async fn run_migrations(conn: &tokio_rusqlite::Connection) -> Result<(), TallerError> {
    let applied = conn
        .call(|conn| {
            Ok::<_, rusqlite::Error>(
                embedded::migrations::runner()
                    .run(conn)
                    .map(|report| report.applied_migrations().len()),
            )
        })
        .await
        .map_err(map_tr_err)?
        .map_err(TallerError::storage)?;
    if applied > 0 {
        debug!(applied, "migrations applied");
    }
    Ok(())
}
