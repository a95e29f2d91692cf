use clap::{Args, Parser, Subcommand};

use crate::{config, utils};

#[derive(Args, Debug, Clone)]
pub struct RunMigrationsArgs {
    /// SQL file name inside `migrations/`
    #[arg(short, long)]
    file: String,
}

#[derive(Args, Debug, Clone)]
pub struct SeedVetsArgs {
    /// JSON file holding an array of vets
    #[arg(short, long)]
    file: String,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Action {
    RunMigrations(RunMigrationsArgs),
    SeedVets(SeedVetsArgs),
}

/// Database maintenance for the pet adoption app
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AppArgs {
    #[command(subcommand)]
    pub action: Action,
}

impl AppArgs {
    pub async fn run(&self) -> anyhow::Result<()> {
        let db_pool = utils::setup_sqlite_db_pool(config::APP_CONFIG.is_prod()).await?;

        match &self.action {
            Action::RunMigrations(RunMigrationsArgs { file }) => {
                utils::run_migrations(&db_pool, file).await
            }
            Action::SeedVets(SeedVetsArgs { file }) => {
                let vets = utils::read_vets_file(file)?;
                let inserted = utils::seed_vets(&db_pool, &vets).await?;
                println!("{inserted} vets inserted from {file}");

                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_vets() {
        let args = AppArgs::parse_from(["scripts", "seed-vets", "--file", "vets.json"]);

        assert!(matches!(
            args.action,
            Action::SeedVets(SeedVetsArgs { ref file }) if file == "vets.json"
        ));
    }

    #[test]
    fn test_parse_run_migrations() {
        let args = AppArgs::parse_from(["scripts", "run-migrations", "-f", "0001_init.sql"]);

        assert!(matches!(
            args.action,
            Action::RunMigrations(RunMigrationsArgs { ref file }) if file == "0001_init.sql"
        ));
    }
}
