use crate::{emit_success, Context};
use chrono::DateTime;
use dealboard::config::{self, DealboardConfig};
use dealboard::format::{format_currency, format_date};
use dealboard::query::stats::saturating_u64;
use dealboard::query::{DashboardStats, QueryEngine, RecordRef};
use dealboard::server::{self, AppState};
use dealboard::storage::ThemePreference;
use dealboard::ui::{self, Icons, RecordRow, Spinner};
use dealboard::{FieldValue, LoadOrigin, LoadedStore, PrefsStore, RecordKind, RecordStore, Skin};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Fields holding dollar amounts
const MONEY_FIELDS: &[&str] = &["funding_raised", "valuation", "total_aum"];

const DEFAULT_RECENT_NEWS: usize = 5;

fn open_prefs(ctx: &Context) -> anyhow::Result<PrefsStore> {
    config::ensure_prefs_dir(&ctx.settings.prefs_path)?;
    let prefs = PrefsStore::open(&ctx.settings.prefs_path)?;
    ui::init_theme(prefs.theme()?);
    Ok(prefs)
}

/// Use the stored theme if a preference database already exists
fn apply_stored_theme(ctx: &Context) {
    if !ctx.settings.prefs_path.exists() {
        return;
    }
    match PrefsStore::open(&ctx.settings.prefs_path).and_then(|p| p.theme()) {
        Ok(theme) => ui::init_theme(theme),
        Err(e) => tracing::debug!(error = %e, "Could not read theme preference"),
    }
}

async fn load_store(ctx: &Context) -> anyhow::Result<LoadedStore> {
    let skin = ctx.settings.skin;
    if ctx.settings.offline {
        tracing::info!(%skin, "Offline mode, using fallback dataset");
        return Ok(LoadedStore {
            store: RecordStore::fallback(skin)?,
            origin: LoadOrigin::Fallback,
        });
    }

    let spinner = Spinner::new(&format!("Loading records from {}", ctx.settings.base_url));
    let source = dealboard::HttpSource::new(ctx.settings.base_url.as_str());
    let loaded = RecordStore::load(&source, skin).await?;
    spinner.finish_and_clear();

    if loaded.origin == LoadOrigin::Fallback && ctx.output_mode.is_human() {
        ui::warn(&format!(
            "Backend unavailable at {}, showing {} sample data",
            ctx.settings.base_url, skin
        ));
    }
    Ok(loaded)
}

fn display_field(name: &str, value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Int(n) if MONEY_FIELDS.contains(&name) => format_currency(n),
        FieldValue::Int(n) if name == "published_at" => i64::try_from(n)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|ts| format_date(&ts))
            .unwrap_or_else(|| n.to_string()),
        FieldValue::Int(n) => n.to_string(),
        FieldValue::Float(x) => format!("{:.1}", x),
        FieldValue::Text(s) => s.to_string(),
        FieldValue::Bool(b) => (if b { "yes" } else { "no" }).to_string(),
        FieldValue::List(items) => items.join(", "),
        FieldValue::Missing => "-".to_string(),
    }
}

fn json_display(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items.iter().map(json_display).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Table row for a record. `value_field` picks the Value column; each kind
/// has its own default.
fn record_row(record: &RecordRef<'_>, value_field: Option<&str>) -> RecordRow {
    let (detail, default_field) = match record {
        RecordRef::Company(c) => (format!("{} · {}", c.industry, c.location), "valuation"),
        RecordRef::Vc(v) => (v.focus_areas.join(", "), "final_score"),
        RecordRef::News(n) => (format!("{} · {}", format_date(&n.published_at), n.category), "read_time"),
    };
    let field = value_field.unwrap_or(default_field);

    RecordRow {
        id: record.id(),
        title: record.title().to_string(),
        detail,
        value: display_field(field, record.field(field)),
    }
}

fn print_records(
    ctx: &Context,
    command: &str,
    title: &str,
    records: &[RecordRef<'_>],
    value_field: Option<&str>,
) -> anyhow::Result<()> {
    if !ctx.output_mode.is_human() {
        return emit_success(ctx.output_mode, command, records);
    }

    ui::section(title);
    if records.is_empty() {
        println!("{}", ui::muted("No records found."));
        return Ok(());
    }

    let rows: Vec<_> = records.iter().map(|r| record_row(r, value_field)).collect();
    println!("{}", ui::record_table(&rows));
    ui::summary_row("Total:", &records.len().to_string());
    Ok(())
}

#[derive(Serialize)]
struct StatsReport<'a> {
    origin: LoadOrigin,
    skin: Skin,
    stats: &'a DashboardStats,
}

pub fn run_init(ctx: &Context, force: bool) -> anyhow::Result<()> {
    let config = DealboardConfig {
        base_url: Some(ctx.settings.base_url.clone()),
        skin: Some(ctx.settings.skin),
        prefs: None,
        offline: Some(ctx.settings.offline),
    };
    config::write_config(&ctx.config_path, &config, force)?;
    open_prefs(ctx)?;
    config::ensure_gitignore(&std::env::current_dir()?)?;

    if ctx.output_mode.is_human() {
        ui::success(&format!("Wrote {}", ctx.config_path.display()));
        ui::status(Icons::DATABASE, "Preferences", &ctx.settings.prefs_path.display().to_string());
        Ok(())
    } else {
        emit_success(ctx.output_mode, "init", serde_json::json!({
            "config": ctx.config_path,
            "prefs": ctx.settings.prefs_path,
        }))
    }
}

pub async fn run_stats(ctx: &Context) -> anyhow::Result<()> {
    apply_stored_theme(ctx);
    let loaded = load_store(ctx).await?;
    let stats = QueryEngine::new(&loaded.store).dashboard_stats();

    if !ctx.output_mode.is_human() {
        return emit_success(ctx.output_mode, "stats", StatsReport {
            origin: loaded.origin,
            skin: ctx.settings.skin,
            stats: &stats,
        });
    }

    ui::header(&format!("Dealboard ({} data, {})", loaded.origin, ctx.settings.skin));

    let c = &stats.companies;
    let p = &stats.partners;
    ui::section(&format!("{} Companies", Icons::COMPANY));
    println!("{}", ui::stats_table(&[
        ("Companies", c.count.to_string()),
        ("Partners", format!("{} ({}%)", p.partner_companies, p.partner_percentage)),
        ("AI natives", c.ai_natives.to_string()),
        ("Digital natives", c.digital_natives.to_string()),
        ("Contacted", c.contacted.to_string()),
        ("Industries", c.industries.to_string()),
        ("Employees", c.total_employees.to_string()),
        ("Total funding", format_currency(saturating_u64(c.total_funding))),
        ("Total valuation", format_currency(saturating_u64(c.total_valuation))),
        ("Avg growth", format!("{}%", c.avg_growth_rate)),
    ]));

    let v = &stats.vcs;
    ui::section(&format!("{} Investors", Icons::INVESTOR));
    println!("{}", ui::stats_table(&[
        ("Firms", v.count.to_string()),
        ("Total AUM", format_currency(saturating_u64(v.total_aum))),
        ("Portfolio companies", v.total_portfolio_companies.to_string()),
        ("Investments", v.total_investments.to_string()),
        ("Avg score", v.avg_score.to_string()),
    ]));

    let n = &stats.news;
    ui::section(&format!("{} News", Icons::NEWS));
    println!("{}", ui::stats_table(&[
        ("Articles", n.count.to_string()),
        ("Funding", n.funding.to_string()),
        ("Product", n.product.to_string()),
        ("Partnership", n.partnership.to_string()),
        ("Other", n.other.to_string()),
        ("Companies covered", n.companies_covered.to_string()),
    ]));
    Ok(())
}

pub async fn run_get(ctx: &Context, kind: RecordKind, id: u64) -> anyhow::Result<()> {
    apply_stored_theme(ctx);
    let loaded = load_store(ctx).await?;
    let engine = QueryEngine::new(&loaded.store);
    let record = engine
        .get(kind, id)
        .ok_or_else(|| anyhow::anyhow!("No {} record with id {}", kind, id))?;

    let (news, investors) = match record {
        RecordRef::Company(c) => (engine.news_for_company(c.id), engine.investors_of(c)),
        _ => (Vec::new(), Vec::new()),
    };
    let portfolio = match record {
        RecordRef::Vc(v) => engine.portfolio_of(v),
        _ => Vec::new(),
    };

    if !ctx.output_mode.is_human() {
        let mut data = serde_json::json!({ "record": record });
        if let RecordRef::Company(_) = record {
            data["news"] = serde_json::to_value(&news)?;
            data["investors"] = serde_json::to_value(&investors)?;
        }
        if let RecordRef::Vc(_) = record {
            data["portfolio"] = serde_json::to_value(&portfolio)?;
        }
        return emit_success(ctx.output_mode, "get", data);
    }

    ui::section(&format!("{} #{}", record.title(), record.id()));
    if let serde_json::Value::Object(fields) = serde_json::to_value(record)? {
        for (name, value) in &fields {
            let shown = match record.field(name) {
                FieldValue::Missing => json_display(value),
                field if MONEY_FIELDS.contains(&name.as_str()) => ui::accent(&display_field(name, field)),
                field => display_field(name, field),
            };
            ui::summary_row(&format!("{}:", name), &shown);
        }
    }

    if !investors.is_empty() {
        ui::section(&format!("{} Investors", Icons::INVESTOR));
        for vc in &investors {
            ui::record_line(Icons::INVESTOR, vc.id, &vc.name, &vc.location);
        }
    }
    if !portfolio.is_empty() {
        ui::section(&format!("{} Portfolio", Icons::COMPANY));
        for company in &portfolio {
            ui::record_line(
                Icons::COMPANY,
                company.id,
                &company.name,
                &ui::accent(&format_currency(company.valuation)),
            );
        }
    }
    if !news.is_empty() {
        ui::section(&format!("{} News", Icons::NEWS));
        for article in &news {
            ui::record_line(Icons::NEWS, article.id, &article.headline, &format_date(&article.published_at));
        }
    }
    Ok(())
}

pub async fn run_filter(ctx: &Context, kind: RecordKind, field: &str, value: &str) -> anyhow::Result<()> {
    apply_stored_theme(ctx);
    if !QueryEngine::knows_field(kind, field) {
        tracing::warn!(%kind, field, "Unknown field, nothing will match");
    }

    let loaded = load_store(ctx).await?;
    let records = QueryEngine::new(&loaded.store).filter(kind, field, value);
    let title = if value.is_empty() {
        format!("All {}", kind)
    } else {
        format!("{} where {} = {}", kind, field, value)
    };
    print_records(ctx, "filter", &title, &records, Some(field).filter(|f| QueryEngine::knows_field(kind, f)))
}

pub async fn run_search(ctx: &Context, query: &str, kind: Option<RecordKind>) -> anyhow::Result<()> {
    let prefs = open_prefs(ctx)?;
    let loaded = load_store(ctx).await?;
    let engine = QueryEngine::new(&loaded.store);
    prefs.record_search(query)?;

    if let Some(kind) = kind {
        let records = engine.search(kind, query);
        return print_records(ctx, "search", &format!("{} {} matching '{}'", Icons::SEARCH, kind, query), &records, None);
    }

    let results = engine.search_all(query);
    if !ctx.output_mode.is_human() {
        return emit_success(ctx.output_mode, "search", &results);
    }

    if results.is_empty() {
        println!("{} {}", Icons::SEARCH, ui::muted(&format!("Nothing matches '{}'.", query)));
        return Ok(());
    }

    let sections: [(&str, Vec<RecordRef<'_>>); 3] = [
        ("Companies", results.companies.iter().copied().map(RecordRef::Company).collect()),
        ("Investors", results.vcs.iter().copied().map(RecordRef::Vc).collect()),
        ("News", results.news.iter().copied().map(RecordRef::News).collect()),
    ];
    for (title, records) in sections {
        if !records.is_empty() {
            print_records(ctx, "search", title, &records, None)?;
        }
    }
    Ok(())
}

pub async fn run_top(ctx: &Context, kind: RecordKind, field: &str, n: usize) -> anyhow::Result<()> {
    apply_stored_theme(ctx);
    if !QueryEngine::knows_field(kind, field) {
        anyhow::bail!("Unknown field '{}' for {}", field, kind);
    }

    let loaded = load_store(ctx).await?;
    let records = QueryEngine::new(&loaded.store).top(kind, field, n);
    print_records(ctx, "top", &format!("{} Top {} {} by {}", Icons::STAR, n, kind, field), &records, Some(field))
}

pub async fn run_news(ctx: &Context, company: Option<u64>, recent: Option<usize>) -> anyhow::Result<()> {
    apply_stored_theme(ctx);
    let loaded = load_store(ctx).await?;
    let engine = QueryEngine::new(&loaded.store);

    let (title, articles) = match company {
        Some(id) => {
            let name = engine
                .company(id)
                .map_or_else(|| format!("company #{}", id), |c| c.name.clone());
            (format!("{} News for {}", Icons::NEWS, name), engine.news_for_company(id))
        }
        None => {
            let limit = recent.unwrap_or(DEFAULT_RECENT_NEWS);
            (format!("{} Latest news", Icons::NEWS), engine.recent_news(limit))
        }
    };

    let records: Vec<_> = articles.into_iter().map(RecordRef::News).collect();
    print_records(ctx, "news", &title, &records, None)
}

pub fn run_recent(ctx: &Context, clear: bool) -> anyhow::Result<()> {
    let prefs = open_prefs(ctx)?;
    if clear {
        prefs.clear_recent_searches()?;
    }
    let searches = prefs.recent_searches()?;

    if !ctx.output_mode.is_human() {
        return emit_success(ctx.output_mode, "recent", &searches);
    }

    if clear {
        ui::success("Cleared recent searches");
    } else if searches.is_empty() {
        println!("{}", ui::muted("No recent searches."));
    } else {
        ui::section(&format!("{} Recent searches", Icons::SEARCH));
        for (i, query) in searches.iter().enumerate() {
            println!("  {} {}", ui::dim(&format!("{:>2}.", i + 1)), query);
        }
    }
    Ok(())
}

pub fn run_theme(ctx: &Context, mode: Option<&str>) -> anyhow::Result<()> {
    let prefs = open_prefs(ctx)?;
    let theme = match mode {
        None => prefs.theme()?,
        Some("toggle") => prefs.toggle_theme()?,
        Some(raw) => {
            let theme: ThemePreference = raw.parse()?;
            prefs.set_theme(theme)?;
            theme
        }
    };

    if !ctx.output_mode.is_human() {
        return emit_success(ctx.output_mode, "theme", theme);
    }

    let icon = match theme {
        ThemePreference::Light => Icons::SUN,
        ThemePreference::Dark => Icons::MOON,
    };
    println!("{} Theme: {}", icon, theme.as_str().bold());
    Ok(())
}

pub async fn run_serve(ctx: &Context, port: u16, static_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let prefs = open_prefs(ctx)?;
    let loaded = load_store(ctx).await?;

    if ctx.output_mode.is_human() {
        ui::status(
            Icons::PLUG,
            "Data",
            &format!(
                "{} ({} companies, {} vcs, {} articles)",
                loaded.origin,
                loaded.store.count(RecordKind::Companies),
                loaded.store.count(RecordKind::Vcs),
                loaded.store.count(RecordKind::News)
            ),
        );
    }

    let state = Arc::new(AppState::new(loaded.store, loaded.origin, prefs));
    server::start_server(port, state, static_dir).await
}
