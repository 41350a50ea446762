use crate::cli::{EntityArgs, QueryArgs, QueryKind};
use crate::config::ProjectConfig;
use crate::input::{parse_assignments, parse_filters};
use pgtable::{BuiltQuery, Filters, Table, prettify_create_table};
use std::fmt::Write as _;

pub fn ddl(args: EntityArgs) -> anyhow::Result<()> {
    let config = ProjectConfig::load(&args.config)?;
    for (name, table) in config.file.tables(args.entity.as_deref())? {
        println!("-- {name}");
        println!("{}", prettify_create_table(&table.create_table()));
        println!();
    }
    Ok(())
}

pub fn templates(args: EntityArgs) -> anyhow::Result<()> {
    let config = ProjectConfig::load(&args.config)?;
    for (name, table) in config.file.tables(args.entity.as_deref())? {
        print!("{}", render_templates(name, &table));
    }
    Ok(())
}

fn render_templates(name: &str, table: &Table) -> String {
    let statements = [
        ("create_table", table.create_table()),
        ("drop_table", table.drop_table()),
        ("insert", table.insert()),
        ("insert_on_conflict_update", table.insert_on_conflict_update()),
        ("update_by_id", table.update_by_id()),
        ("select_by_id", table.select_by_id()),
        ("delete_by_id", table.delete_by_id()),
    ];

    let mut out = String::new();
    let _ = writeln!(out, "-- {name}");
    for (label, sql) in statements {
        let _ = writeln!(out, "{label}: {sql}");
    }
    out.push('\n');
    out
}

pub fn query(args: QueryArgs) -> anyhow::Result<()> {
    let config = ProjectConfig::load(&args.config)?;
    let tables = config.file.tables(Some(args.entity.as_str()))?;
    let Some((_, table)) = tables.into_iter().next() else {
        anyhow::bail!("unknown entity: {}", args.entity);
    };

    let built = build_query(&table, &args)?;
    print!("{}", render_query(&built));
    Ok(())
}

fn build_query(table: &Table, args: &QueryArgs) -> anyhow::Result<BuiltQuery> {
    let filters = match &args.filters {
        Some(json) => parse_filters(json)?,
        None => Filters::new(),
    };
    tracing::debug!(kind = ?args.kind, entity = %args.entity, "building query");

    let built = match args.kind {
        QueryKind::Select => {
            let order: Vec<&str> = args.order.iter().map(String::as_str).collect();
            table.select_query(&order, args.limit, args.offset, &filters)?
        }
        QueryKind::Count => table.select_count_query(&filters)?,
        QueryKind::Delete => table.delete_query(&filters)?,
        QueryKind::DeleteReturningId => table.delete_returning_id_query(&filters)?,
        QueryKind::Update => {
            let Some(set) = &args.set else {
                anyhow::bail!("update requires --set");
            };
            table.update_query(&parse_assignments(set)?, &filters)?
        }
    };
    Ok(built)
}

fn render_query(built: &BuiltQuery) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", built.sql);
    for (i, value) in built.params.iter().enumerate() {
        let _ = writeln!(out, "  ${} = {value} ({})", i + 1, value.kind_name());
    }
    out
}
