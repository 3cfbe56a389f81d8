//! `migrate`: apply, preview or revert the embedded migrations.

use crate::config::Settings;
use crate::db::{pending_migrations, revert_migrations, run_pending_migrations};
use crate::error::AppResult;

pub struct MigrateCommandHandler {
    settings: Settings,
}

impl MigrateCommandHandler {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.settings.database.validate()?;
        let url = &self.settings.database.url;

        match (dry_run, rollback) {
            (true, _) => {
                let pending = pending_migrations(url).await?;
                if pending.is_empty() {
                    println!("✓ Database is up to date");
                } else {
                    println!("{} pending migration(s):", pending.len());
                    print_names(&pending);
                    println!("Run without --dry-run to apply them");
                }
            }
            (false, Some(steps)) => {
                let reverted = revert_migrations(url, steps).await?;
                println!("✓ Reverted {} migration(s):", reverted.len());
                print_names(&reverted);
            }
            (false, None) => {
                let applied = run_pending_migrations(url).await?;
                if applied.is_empty() {
                    println!("✓ Nothing to apply, database is up to date");
                } else {
                    println!("✓ Applied {} migration(s):", applied.len());
                    print_names(&applied);
                }
            }
        }

        Ok(())
    }
}

fn print_names(names: &[String]) {
    for name in names {
        println!("  - {name}");
    }
}
