use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use deskpulse::analytics::{self, DashboardReport};
use deskpulse::ticket::{sort_tickets, NormalizedTicket, SortDirection, SortField, TicketSort};
use deskpulse::{DeskPulse, LoadOptions, Window};

#[derive(Parser)]
#[command(name = "deskpulse", about = "Helpdesk analytics for Asana boards")]
struct Cli {
    /// Database path (default: ~/.deskpulse/deskpulse.db)
    #[arg(long)]
    db: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Page size for Asana API requests (default: config page_size, else 100)
    #[arg(long)]
    page_size: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dashboard report: trends, categories, automation savings
    Report {
        #[command(flatten)]
        source: SourceArgs,
        /// Trend window, e.g. 90d, 12w, 6m, 1y (default: config default_window)
        #[arg(long)]
        window: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Business hours between two timestamps
    Hours {
        start: String,
        end: String,
        #[arg(long)]
        json: bool,
    },
    /// Open tickets and aging per department
    Departments {
        #[command(flatten)]
        source: SourceArgs,
        /// Department to list tickets for (default: all departments)
        #[arg(long)]
        department: Option<String>,
        #[command(flatten)]
        sort: SortArgs,
        #[arg(long)]
        json: bool,
    },
    /// Open tickets waiting on the customer
    Blockers {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        sort: SortArgs,
        #[arg(long)]
        json: bool,
    },
    /// Manage helpdesk boards
    Board {
        #[command(subcommand)]
        action: BoardAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage the fetched-data cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Board name (see `deskpulse board list`)
    board: Option<String>,
    /// Read an Asana JSON export instead of fetching a board
    #[arg(long, value_name = "PATH", conflicts_with = "board")]
    from_file: Option<PathBuf>,
    /// Skip the board's archive project
    #[arg(long)]
    no_archive: bool,
    /// Ignore cached data and fetch again
    #[arg(long)]
    refresh: bool,
    /// Keep board tickets created more than 12 months ago
    #[arg(long)]
    all_history: bool,
}

#[derive(Args)]
struct SortArgs {
    /// Sort tickets by this column
    #[arg(long, value_enum, default_value = "age")]
    sort: SortColumn,
    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortColumn {
    Age,
    Created,
    Name,
    Assignee,
    Department,
    Response,
}

impl SortArgs {
    fn ticket_sort(&self) -> TicketSort {
        let field = match self.sort {
            SortColumn::Age => SortField::TicketAge,
            SortColumn::Created => SortField::CreatedAt,
            SortColumn::Name => SortField::Name,
            SortColumn::Assignee => SortField::Assignee,
            SortColumn::Department => SortField::Department,
            SortColumn::Response => SortField::ResponseTime,
        };
        let direction = if self.asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        TicketSort::new(field, direction)
    }
}

#[derive(Subcommand)]
enum BoardAction {
    /// Register a board by project GID or URL
    Add {
        name: String,
        #[arg(value_name = "PROJECT_GID_OR_URL")]
        project: String,
        /// Archive project GID or URL
        #[arg(long)]
        archive: Option<String>,
        /// Display name (default: the Asana project name)
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Remove a board and its cached data
    Remove { name: String },
    /// List boards
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a config value
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// List all config values and known keys
    List,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Drop cached data for one board, or all boards
    Clear { board: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let db = match &cli.db {
        Some(path) => deskpulse::Database::open_at(path).await?,
        None => deskpulse::Database::open().await?,
    };
    let app = DeskPulse::new(db);

    match cli.command {
        Commands::Hours { start, end, json } => {
            let calendar = app.calendar().await?;
            handle_hours(&calendar, &start, &end, json)?;
        }
        Commands::Report {
            source,
            window,
            json,
        } => {
            let app = connect(app, &source, cli.page_size).await?;
            let window = match window {
                Some(w) => Window::parse(&w)?,
                None => app.default_window().await?,
            };
            let now = chrono::Local::now().naive_local();
            let tickets = load_tickets(&app, &source, now).await?;
            let calendar = app.calendar().await?;
            let report = analytics::analyze(&tickets, &calendar, window.days(), now);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, window);
            }
        }
        Commands::Departments {
            source,
            department,
            sort,
            json,
        } => {
            let app = connect(app, &source, cli.page_size).await?;
            let now = chrono::Local::now().naive_local();
            let tickets = load_tickets(&app, &source, now).await?;
            handle_departments(&tickets, department.as_deref(), &sort, json)?;
        }
        Commands::Blockers { source, sort, json } => {
            let app = connect(app, &source, cli.page_size).await?;
            let now = chrono::Local::now().naive_local();
            let tickets = load_tickets(&app, &source, now).await?;
            let project_gid = match &source.board {
                Some(board) => app.board(board).await?.project_gid,
                None => "0".to_string(),
            };
            handle_blockers(&tickets, &project_gid, &sort, json)?;
        }
        Commands::Board { action } => {
            let app = match asanaclient::Client::from_env() {
                Ok(client) => app.with_client(client),
                Err(e) => {
                    log::info!("No Asana client ({e}); board names will not be looked up");
                    app
                }
            };
            handle_board(&app, action).await?;
        }
        Commands::Config { action } => {
            handle_config(&app, action).await?;
        }
        Commands::Cache {
            action: CacheAction::Clear { board },
        } => {
            let removed = app.cache_clear(board.as_deref()).await?;
            println!("Removed {removed} cached entries.");
        }
    }

    Ok(())
}

/// Attach an Asana client when the command reads a board.
async fn connect(
    app: DeskPulse,
    source: &SourceArgs,
    page_size: Option<u32>,
) -> anyhow::Result<DeskPulse> {
    if source.from_file.is_some() {
        return Ok(app);
    }
    let mut client = match asanaclient::Client::from_env() {
        Ok(client) => client,
        Err(e) => {
            // Cached board data can still be used without a token.
            log::warn!("Asana client unavailable: {e}");
            return Ok(app);
        }
    };
    if let Some(ps) = page_size.or(app.page_size().await?) {
        client = client.with_page_size(ps);
    }
    Ok(app.with_client(client))
}

async fn load_tickets(
    app: &DeskPulse,
    source: &SourceArgs,
    now: chrono::NaiveDateTime,
) -> anyhow::Result<Vec<NormalizedTicket>> {
    if let Some(path) = &source.from_file {
        return Ok(app.file_tickets(path, now).await?);
    }
    let board = source
        .board
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Specify a board name or --from-file <PATH>."))?;
    let opts = LoadOptions {
        include_archive: !source.no_archive,
        refresh: source.refresh,
        all_history: source.all_history,
    };
    Ok(app.board_tickets(board, opts, now).await?)
}

fn handle_hours(
    calendar: &deskpulse::HolidayCalendar,
    start: &str,
    end: &str,
    json: bool,
) -> anyhow::Result<()> {
    let hours = deskpulse::calculate_business_hours(calendar, start, end)
        .ok_or_else(|| anyhow::anyhow!("Could not parse timestamps '{start}' and '{end}'."))?;
    if json {
        let out = serde_json::json!({ "start": start, "end": end, "business_hours": hours });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{hours:.2} business hours");
    }
    Ok(())
}

fn handle_departments(
    tickets: &[NormalizedTicket],
    department: Option<&str>,
    sort: &SortArgs,
    json: bool,
) -> anyhow::Result<()> {
    let department = department.unwrap_or(analytics::ALL_DEPARTMENTS);
    let stats = analytics::department_stats(tickets, department);
    let mut open: Vec<NormalizedTicket> = analytics::filter_by_department(tickets, department)
        .into_iter()
        .cloned()
        .collect();
    sort_tickets(&mut open, sort.ticket_sort());

    if json {
        let out = serde_json::json!({
            "department": department,
            "departments": analytics::extract_departments(tickets),
            "stats": stats,
            "tickets": open,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Departments: {}", analytics::extract_departments(tickets).join(", "));
    println!();
    println!("{department}");
    println!("  Open:          {}", stats.total_open);
    println!("  Aged (>14d):   {}", stats.aged);
    println!("  Critical (>30d): {}", stats.critical);
    println!("  Average age:   {:.2} days", stats.average_age);
    println!();
    for t in &open {
        print_ticket_line(t);
    }
    Ok(())
}

fn handle_blockers(
    tickets: &[NormalizedTicket],
    project_gid: &str,
    sort: &SortArgs,
    json: bool,
) -> anyhow::Result<()> {
    let mut blocked: Vec<NormalizedTicket> =
        analytics::blockers(tickets).into_iter().cloned().collect();
    sort_tickets(&mut blocked, sort.ticket_sort());

    if json {
        let out: Vec<serde_json::Value> = blocked
            .iter()
            .map(|t| {
                serde_json::json!({
                    "ticket": t,
                    "url": deskpulse::url::task_url(project_gid, &t.id),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if blocked.is_empty() {
        println!("No tickets are waiting on the customer.");
        return Ok(());
    }
    println!("{} tickets waiting on the customer:", blocked.len());
    for t in &blocked {
        print_ticket_line(t);
        println!("      {}", deskpulse::url::task_url(project_gid, &t.id));
    }
    Ok(())
}

async fn handle_board(app: &DeskPulse, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::Add {
            name,
            project,
            archive,
            display_name,
        } => {
            let board = app
                .board_add(&name, &project, archive.as_deref(), display_name.as_deref())
                .await?;
            println!("Added board {} ({})", board.board_key, board.label());
        }
        BoardAction::Remove { name } => {
            if app.board_remove(&name).await? {
                println!("Removed: {name}");
            } else {
                println!("Not found: {name}");
            }
        }
        BoardAction::List { json } => {
            let boards = app.board_list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&boards)?);
            } else if boards.is_empty() {
                println!("No boards. Run: deskpulse board add <NAME> <PROJECT_GID_OR_URL>");
            } else {
                for b in boards {
                    let archive = b.archive_gid.as_deref().unwrap_or("none");
                    println!(
                        "{} {} (project {}, archive {})",
                        b.board_key,
                        b.display_name.as_deref().unwrap_or(""),
                        b.project_gid,
                        archive
                    );
                }
            }
        }
    }
    Ok(())
}

async fn handle_config(app: &DeskPulse, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => match app.config_get(&key).await? {
            Some(v) => println!("{key} = {v}"),
            None => println!("{key} is not set"),
        },
        ConfigAction::Set { key, value } => {
            app.config_set(&key, &value).await?;
            println!("Config updated.");
        }
        ConfigAction::List => {
            let items = app.config_list().await?;
            if items.is_empty() {
                println!("No configuration set.");
            } else {
                for (k, v) in &items {
                    println!("{k} = {v}");
                }
            }
            println!();
            println!("Known keys:");
            for (key, help) in deskpulse::config::KNOWN_KEYS {
                println!("  {key:<16} {help}");
            }
        }
    }
    Ok(())
}

fn print_ticket_line(t: &NormalizedTicket) {
    let response = t
        .response_time_hours
        .map(|h| format!("{h:.1}h"))
        .unwrap_or_else(|| "-".into());
    println!(
        "  {:>6.1}d  {:<40}  {:<20}  {:<16}  {}",
        t.ticket_age,
        truncate(&t.name, 40),
        truncate(&t.assignee, 20),
        t.department().unwrap_or_default(),
        response
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}

fn print_report(r: &DashboardReport, window: Window) {
    let s = &r.summary;
    println!(
        "Helpdesk report ({window} window, as of {})",
        r.generated_at.format("%Y-%m-%d %H:%M")
    );
    println!("  Tickets:        {} ({} open, {} closed)", s.total, s.open, s.closed);
    println!("  Automated:      {}", s.automated);
    println!("  Avg response:   {:.2} business hours", s.avg_response_hours);
    println!("  Avg open age:   {:.2} days", s.avg_open_age_days);
    println!("  Blockers:       {}", r.blocker_count);

    let d = &r.departments;
    println!("  Aged (>14d):    {}", d.aged);
    println!("  Critical (>30d): {}", d.critical);

    let c = &r.response_comparison;
    println!();
    println!("Response time (last 2 days vs previous 88):");
    println!("  Recent:         {:.2}h ({} tickets)", c.recent_average, c.recent_count);
    println!("  Previous:       {:.2}h ({} tickets)", c.previous_average, c.previous_count);
    println!("  Improvement:    {:.1}%", c.improvement);

    if !r.response_trend.is_empty() {
        println!();
        println!("Weekly first response:");
        for p in &r.response_trend {
            println!("  {:<8} {:>7.2}h  ({} tickets)", p.label, p.avg_response_hours, p.count);
        }
    }

    if let (Some(first), Some(last)) = (r.open_ticket_trend.first(), r.open_ticket_trend.last()) {
        println!();
        println!(
            "Open tickets: {} on {} -> {} on {}",
            first.open_count, first.label, last.open_count, last.label
        );
        let created: u64 = r.net_new_trend.iter().map(|p| p.created).sum();
        let closed: u64 = r.net_new_trend.iter().map(|p| p.closed).sum();
        println!("  Created {created}, closed {closed} in window");
    }

    if !r.categories.is_empty() {
        println!();
        println!("Top categories:");
        for cat in &r.categories {
            println!(
                "  {:<16} {:>5} total  {:>5} open  {:>5} closed",
                cat.category, cat.total_count, cat.open_count, cat.closed_count
            );
        }
    }

    if !r.status_distribution.is_empty() {
        println!();
        println!("Open by status:");
        for st in &r.status_distribution {
            println!("  {:<24} {:>5}", st.status, st.count);
        }
    }

    let a = &r.automation;
    println!();
    println!("Automation:");
    println!("  Automated / manual:  {} / {}", a.automated_count, a.manual_count);
    println!(
        "  Time saved:          {:.2}h ({:.2} work days)",
        a.total_hours_saved, a.total_days_saved
    );
    println!("  Per ticket:          {:.2} min", a.average_time_saved_per_ticket);
    println!(
        "  Response:            {:.2}h automated vs {:.2}h manual ({:.1}% faster)",
        a.automated_avg_response_hours, a.manual_avg_response_hours, a.response_time_improvement
    );
    println!(
        "  Tickets per day:     {:.2} ({:.2} automated)",
        a.ticket_rate.per_day, a.automated_ticket_rate.per_day
    );
    let p = &a.projections;
    println!("  This month:          {:.2}h", p.current_month_savings);
    println!(
        "  Forecast:            {:.2}h/month ({:.2} days), {:.2}h/year ({:.2} days)",
        p.monthly_forecast, p.monthly_forecast_days, p.yearly_forecast, p.yearly_forecast_days
    );
    for stage in &a.by_stage {
        println!(
            "    {:<24} {:>5} tickets  {:>6} min  {:>7.2}h",
            stage.stage, stage.count, stage.total_minutes_saved, stage.total_hours_saved
        );
    }
}
