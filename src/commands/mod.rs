use anyhow::{Context, Result, bail};
use log::{debug, info};

use crate::{
    api::{AdminApi, PackageId, PackageQuery},
    notify::Notifier,
    page::{
        Mutation, PackagesPage,
        form::{self, PackageForm},
        render,
    },
    runtime::Runtime,
};

pub mod config;
mod shell;

pub use shell::{ShellCommand, run_shell};

use config::Config;

/// Print the package grid for a query
#[tracing::instrument(skip(config))]
pub async fn list<R: Runtime, A: AdminApi, N: Notifier>(
    config: Config<R, A, N>,
    query: PackageQuery,
    json: bool,
) -> Result<()> {
    let (_runtime, page) = config.into_page();
    let page = with_query(page, query);
    let view = page.load().await;

    if json {
        let out = serde_json::to_string_pretty(view.packages())
            .context("Failed to serialize packages")?;
        println!("{}", out);
    } else {
        print!("{}", render::list(&view));
    }
    Ok(())
}

/// Print the whole page: header, filters, grid and summary
#[tracing::instrument(skip(config))]
pub async fn dashboard<R: Runtime, A: AdminApi, N: Notifier>(
    config: Config<R, A, N>,
    query: PackageQuery,
) -> Result<()> {
    let (_runtime, page) = config.into_page();
    let page = with_query(page, query);
    let view = page.load().await;
    print!("{}", render::page(page.query(), &view));
    Ok(())
}

/// Print one package with its full description
#[tracing::instrument(skip(config))]
pub async fn show<R: Runtime, A: AdminApi, N: Notifier>(
    config: Config<R, A, N>,
    query: PackageQuery,
    id: &PackageId,
) -> Result<()> {
    let (_runtime, page) = config.into_page();
    let page = with_query(page, query);
    let view = page.load().await;

    match view.find(id) {
        Some(pkg) => {
            print!("{}", render::preview(pkg));
            Ok(())
        }
        None => bail!("Package {} is not in the list for {}.", id, page.query()),
    }
}

/// Approve, feature or delete a package. Deletion asks for confirmation
/// unless `assume_yes` is set.
#[tracing::instrument(skip(config))]
pub async fn mutate<R: Runtime, A: AdminApi, N: Notifier>(
    config: Config<R, A, N>,
    mutation: Mutation,
    id: &PackageId,
    assume_yes: bool,
) -> Result<()> {
    let (runtime, page) = config.into_page();

    if mutation == Mutation::Delete && !assume_yes {
        let prompt = format!("Delete package {}?", id);
        if !runtime.confirm(&prompt)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    page.mutate(mutation, id)
        .await
        .with_context(|| format!("Failed to {} package {}", mutation, id))
}

/// Validate the create-package dialog and show the resulting draft
#[tracing::instrument(skip(runtime, package_form))]
pub fn create<R: Runtime>(runtime: &R, package_form: &PackageForm) -> Result<()> {
    debug!("Validating package form {:?}", package_form);
    let draft = package_form.validate(runtime)?;

    print!("{}", form::render_dialog(&draft));
    println!();
    println!("{}", form::NOT_SUBMITTED);
    info!("Draft for {} validated; no create endpoint to submit to", draft.name);
    Ok(())
}

/// Interactive page on stdin/stdout
pub async fn shell<R: Runtime, A: AdminApi, N: Notifier>(config: Config<R, A, N>) -> Result<()> {
    let (_runtime, page) = config.into_page();
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_shell(page, stdin, &mut stdout).await
}

fn with_query<A: AdminApi, N: Notifier>(
    mut page: PackagesPage<A, N>,
    query: PackageQuery,
) -> PackagesPage<A, N> {
    page.set_search(query.search);
    page.set_category(query.category);
    page
}
