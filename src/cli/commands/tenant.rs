use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::Tenant;
use crate::tenant::{PgTenantDirectory, ResolveInput, TenantDirectory, TenantResolver};

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "List active tenants in the main database")]
    List,

    #[command(about = "Show which tenant and database a host resolves to")]
    Resolve {
        #[arg(help = "Host header value, e.g. paris.paymydine.com")]
        host: String,

        #[arg(long, help = "Tenant override, as ?tenant= would pass it")]
        tenant: Option<String>,
    },
}

pub async fn handle(cmd: TenantCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let databases = DatabaseManager::new(config().database.clone())?;
    let directory: Arc<dyn TenantDirectory> = Arc::new(PgTenantDirectory::new(databases.default_pool()));

    let result = match cmd {
        TenantCommands::List => list(directory.as_ref(), &output_format).await,
        TenantCommands::Resolve { host, tenant } => {
            let resolver = TenantResolver::new(directory, config().tenancy.clone());
            resolve(&resolver, &databases, &host, tenant.as_deref(), &output_format).await
        }
    };

    databases.close_all().await;
    result
}

async fn list(directory: &dyn TenantDirectory, output_format: &OutputFormat) -> anyhow::Result<()> {
    let tenants = directory.list_active().await?;
    if tenants.is_empty() {
        return output_empty_collection(output_format, "tenants", "No active tenants");
    }

    match output_format {
        OutputFormat::Json => output_json(&json!({ "tenants": tenants }))?,
        OutputFormat::Text => {
            println!("{:<6} {:<25} {:<30} {:<20} {}", "ID", "NAME", "DOMAIN", "DATABASE", "STATUS");
            println!("{}", "-".repeat(90));
            for tenant in &tenants {
                print_row(tenant);
            }
        }
    }
    Ok(())
}

async fn resolve(
    resolver: &TenantResolver,
    databases: &DatabaseManager,
    host: &str,
    tenant_override: Option<&str>,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let input = ResolveInput {
        host: Some(host),
        tenant_override,
    };
    let candidate = resolver.hint(input).map(|hint| hint.subdomain);
    let tenant = resolver.resolve(input).await?;
    let database = databases.target_database(tenant.as_ref());

    match output_format {
        OutputFormat::Json => output_json(&json!({
            "host": host,
            "candidate": candidate,
            "tenant": tenant,
            "database": database,
        }))?,
        OutputFormat::Text => {
            println!("Host:      {}", host);
            println!("Candidate: {}", candidate.as_deref().unwrap_or("(none)"));
            match &tenant {
                Some(tenant) => println!("Tenant:    {} (id {}, {})", tenant.name, tenant.id, tenant.domain),
                None => println!("Tenant:    (none, default database)"),
            }
            println!("Database:  {}", database);
        }
    }
    Ok(())
}

fn print_row(tenant: &Tenant) {
    println!(
        "{:<6} {:<25} {:<30} {:<20} {}",
        tenant.id,
        truncate(&tenant.name, 25),
        truncate(&tenant.domain, 30),
        truncate(&tenant.database, 20),
        tenant.status
    );
}
