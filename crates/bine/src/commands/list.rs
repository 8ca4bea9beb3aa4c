//! List command

use anyhow::{Context, Result};
use bine_install::ListItem;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::{GlobalOptions, ListArgs};
use crate::output;

#[derive(Tabled)]
struct BinRow {
    name: String,
    version: String,
}

#[derive(Tabled)]
struct OutdatedRow {
    name: String,
    version: String,
    latest: String,
    error: String,
}

pub async fn run(args: ListArgs, global: &GlobalOptions) -> Result<()> {
    let bine = super::open(global).await?;

    let spinner = args
        .outdated
        .then(|| output::spinner("Checking upstream releases..."));
    let result = bine.list(args.installed, args.outdated).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let items = result?;

    if args.json {
        let json = serde_json::to_string_pretty(&items).context("Failed to serialize list to JSON")?;
        println!("{}", json);
    } else if items.is_empty() {
        output::info(if args.outdated {
            "Everything is up to date"
        } else {
            "No binaries found"
        });
    } else {
        println!("{}", render(items, args.outdated));
    }

    Ok(())
}

fn render(items: Vec<ListItem>, outdated: bool) -> String {
    let mut table = if outdated {
        Table::new(items.into_iter().map(|item| OutdatedRow {
            name: item.name,
            version: item.version,
            latest: item.latest,
            error: item.outdated_check_error,
        }))
    } else {
        Table::new(items.into_iter().map(|item| BinRow {
            name: item.name,
            version: item.version,
        }))
    };
    table.with(Style::sharp());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, latest: &str, error: &str) -> ListItem {
        ListItem {
            name: name.into(),
            version: "v1.0.0".into(),
            latest: latest.into(),
            outdated_check_error: error.into(),
        }
    }

    #[test]
    fn test_render_plain() {
        let table = render(vec![item("perpignan", "", "")], false);
        assert!(table.contains("name"));
        assert!(table.contains("perpignan"));
        assert!(table.contains("v1.0.0"));
        assert!(!table.contains("latest"));
    }

    #[test]
    fn test_render_outdated_with_error() {
        let table = render(
            vec![
                item("perpignan", "v1.0.1", ""),
                item("jq", "", "upstream returned 503"),
            ],
            true,
        );
        assert!(table.contains("latest"));
        assert!(table.contains("v1.0.1"));
        assert!(table.contains("upstream returned 503"));
    }
}
