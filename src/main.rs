use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use tourdesk::admin::{self, AdminNav, BookingList, CompanyForm, OfferEditor, OfferList};
use tourdesk::api::{ApiClient, TourOfferForm, TravelApi};
use tourdesk::catalog::DestinationBrowser;
use tourdesk::config;
use tourdesk::intake::{BookingForm, SubmitOutcome};
use tourdesk::model::{BookingStatus, BudgetBracket};
use tourdesk::session::SessionStore;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a tour request to the agency
    Book(BookArgs),
    /// Browse the public destination catalog
    Destinations {
        /// Keep loading pages until the catalog is exhausted
        #[arg(long)]
        all: bool,
    },
    /// Log in to the admin back office
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Opaque reCAPTCHA token forwarded to the login endpoint
        #[arg(long, default_value = "")]
        recaptcha_token: String,
    },
    /// Drop the stored admin session
    Logout,
    /// Administer tour offers
    #[command(subcommand)]
    Offers(OffersCmd),
    /// Administer bookings
    #[command(subcommand)]
    Bookings(BookingsCmd),
    /// Administer the company profile
    #[command(subcommand)]
    Company(CompanyCmd),
}

#[derive(Debug, Args)]
struct BookArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    destination: String,
    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    start: String,
    /// Check-out date (YYYY-MM-DD)
    #[arg(long)]
    end: String,
    #[arg(long, default_value_t = 2)]
    adults: u8,
    /// One flag per traveling child, e.g. --child-age 5 --child-age 9
    #[arg(long = "child-age")]
    child_ages: Vec<u8>,
    /// economy | standard_1 | standard_2 | luxury
    #[arg(long)]
    budget: String,
}

#[derive(Debug, Subcommand)]
enum OffersCmd {
    List {
        #[arg(long)]
        page: Option<u32>,
    },
    Show {
        id: i64,
    },
    New(OfferFieldArgs),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: OfferFieldArgs,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct OfferFieldArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    hotel: Option<String>,
    #[arg(long)]
    price: Option<i64>,
    #[arg(long)]
    description: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    start_date: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    end_date: Option<String>,
    /// Image file to upload (jpeg/png/gif/webp)
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum BookingsCmd {
    List {
        #[arg(long)]
        page: Option<u32>,
    },
    /// Change one booking's status (pending | confirmed | cancelled | completed)
    SetStatus {
        id: i64,
        status: String,
        #[arg(long)]
        yes: bool,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum CompanyCmd {
    Show,
    Edit {
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        telegram: Option<String>,
        #[arg(long)]
        instagram: Option<String>,
        #[arg(long)]
        whatsapp: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let cfg = config::load(Some(&cli.config))?;
    cfg.ensure_dirs()?;

    let api = ApiClient::new(&cfg)?;
    let session = SessionStore::new(&cfg.app.data_dir);
    let page_size = cfg.app.page_size;

    match cli.command {
        Command::Book(args) => book(&api, args).await,
        Command::Destinations { all } => destinations(&api, page_size, all).await,
        Command::Login {
            email,
            password,
            recaptcha_token,
        } => {
            let resp = api.login(&email, &password, &recaptcha_token).await?;
            session.save(&resp.token)?;
            println!("Logged in.");
            Ok(())
        }
        Command::Logout => {
            session.clear();
            println!("Logged out.");
            Ok(())
        }
        Command::Offers(cmd) => offers(&api, &session, page_size, cmd).await,
        Command::Bookings(cmd) => bookings(&api, &session, page_size, cmd).await,
        Command::Company(cmd) => company(&api, &session, cmd).await,
    }
}

async fn book(api: &dyn TravelApi, args: BookArgs) -> Result<()> {
    if args.child_ages.len() > usize::from(tourdesk::intake::MAX_CHILDREN) {
        bail!(
            "at most {} children per request",
            tourdesk::intake::MAX_CHILDREN
        );
    }
    let budget: BudgetBracket = args.budget.parse().map_err(anyhow::Error::msg)?;

    let mut form = BookingForm::new();
    form.set_name(&args.name);
    form.set_phone(&args.phone);
    form.set_email(&args.email);
    form.set_destination(&args.destination);
    form.set_start_date(parse_date(&args.start)?);
    form.set_end_date(parse_date(&args.end)?);
    form.adjust_adults(i32::from(args.adults) - i32::from(form.draft().adults));
    form.adjust_children(args.child_ages.len() as i32);
    for (index, age) in args.child_ages.iter().enumerate() {
        if !(tourdesk::intake::MIN_CHILD_AGE..=tourdesk::intake::MAX_CHILD_AGE).contains(age) {
            bail!("child ages must be between 1 and 17");
        }
        form.set_child_age(index, *age);
    }
    form.set_budget(budget);

    match form.submit(api).await {
        SubmitOutcome::Accepted => {
            if let Some(banner) = form.banner() {
                println!("{}", banner.message);
            }
            Ok(())
        }
        SubmitOutcome::Failed => {
            let message = form
                .banner()
                .map(|b| b.message.clone())
                .unwrap_or_else(|| "request failed".to_string());
            bail!("{message}");
        }
        SubmitOutcome::Invalid(err) => bail!("{err}"),
        SubmitOutcome::AlreadyInFlight => unreachable!("single submit per invocation"),
    }
}

async fn destinations(api: &dyn TravelApi, page_size: u32, all: bool) -> Result<()> {
    let mut browser = DestinationBrowser::new(page_size);
    browser.fetch_first(api).await;
    if let Some(err) = browser.error() {
        bail!("{err}");
    }
    if all {
        while browser.has_more() {
            browser.load_more(api).await;
            if let Some(err) = browser.error() {
                bail!("{err}");
            }
        }
    }

    if browser.items().is_empty() {
        println!("No destinations found.");
        return Ok(());
    }
    for d in browser.items() {
        let price = d
            .min_price
            .map(|p| format!("from {p} rub"))
            .unwrap_or_else(|| "price on request".to_string());
        println!("{:>5}  {:<30} {}", d.id, d.title, price);
    }
    if browser.has_more() {
        println!("(more available; pass --all)");
    }
    Ok(())
}

async fn offers(
    api: &dyn TravelApi,
    session: &SessionStore,
    page_size: u32,
    cmd: OffersCmd,
) -> Result<()> {
    match cmd {
        OffersCmd::List { page } => {
            let mut list = OfferList::new(page_size);
            ensure_stay(list.fetch(api, session).await)?;
            if let Some(page) = page {
                ensure_stay(list.set_page(api, session, page).await)?;
            }
            if let Some(err) = list.error() {
                bail!("{err}");
            }
            print_offers(&list);
            Ok(())
        }
        OffersCmd::Show { id } => {
            let mut editor = OfferEditor::new();
            ensure_stay(editor.load(api, session, id).await)?;
            if let Some(err) = editor.error() {
                bail!("{err}");
            }
            let offer = editor.offer().context("offer not found")?;
            println!("#{} {}", offer.id, offer.title);
            println!("Hotel:       {}", offer.hotel);
            println!("Price:       {} rub", offer.price);
            println!("Dates:       {} .. {}", offer.start_date, offer.end_date);
            println!(
                "Image:       {}",
                offer.image_url.as_deref().unwrap_or("(no image)")
            );
            println!("Description: {}", offer.description);
            Ok(())
        }
        OffersCmd::New(fields) => {
            let form = TourOfferForm {
                title: fields.title.context("--title is required")?,
                hotel: fields.hotel.context("--hotel is required")?,
                price: fields.price.context("--price is required")?,
                description: fields.description.context("--description is required")?,
                start_date: parse_date(&fields.start_date.context("--start-date is required")?)?,
                end_date: parse_date(&fields.end_date.context("--end-date is required")?)?,
                image: fields.image,
            };
            match admin::offers::create_offer(api, session, &form).await {
                admin::SaveOutcome::Saved => {
                    println!("Tour offer created.");
                    Ok(())
                }
                admin::SaveOutcome::RedirectLogin => bail_login(),
                admin::SaveOutcome::Failed(message) => bail!("{message}"),
            }
        }
        OffersCmd::Edit { id, fields } => {
            let mut editor = OfferEditor::new();
            ensure_stay(editor.load(api, session, id).await)?;
            if let Some(err) = editor.error() {
                bail!("{err}");
            }
            let current = editor.offer().context("offer not found")?.clone();
            editor.begin_edit();
            let form = TourOfferForm {
                title: fields.title.unwrap_or(current.title),
                hotel: fields.hotel.unwrap_or(current.hotel),
                price: fields.price.unwrap_or(current.price),
                description: fields.description.unwrap_or(current.description),
                start_date: match fields.start_date {
                    Some(s) => parse_date(&s)?,
                    None => current.start_date,
                },
                end_date: match fields.end_date {
                    Some(s) => parse_date(&s)?,
                    None => current.end_date,
                },
                image: fields.image,
            };
            match editor.save(api, session, &form).await {
                admin::SaveOutcome::Saved => {
                    println!("Tour offer updated.");
                    Ok(())
                }
                admin::SaveOutcome::RedirectLogin => bail_login(),
                admin::SaveOutcome::Failed(message) => bail!("{message}"),
            }
        }
        OffersCmd::Delete { id, yes } => {
            let mut list = OfferList::new(page_size);
            ensure_stay(list.fetch(api, session).await)?;
            list.request_delete(id);
            if !yes && !confirm(&format!("Delete tour offer {id}?")) {
                list.cancel_delete();
                println!("Cancelled.");
                return Ok(());
            }
            ensure_stay(list.confirm_delete(api, session).await)?;
            if let Some(err) = list.error() {
                bail!("{err}");
            }
            println!("Deleted.");
            Ok(())
        }
    }
}

async fn bookings(
    api: &dyn TravelApi,
    session: &SessionStore,
    page_size: u32,
    cmd: BookingsCmd,
) -> Result<()> {
    match cmd {
        BookingsCmd::List { page } => {
            let mut list = BookingList::new(page_size);
            ensure_stay(list.fetch(api, session).await)?;
            if let Some(page) = page {
                ensure_stay(list.set_page(api, session, page).await)?;
            }
            if let Some(err) = list.error() {
                bail!("{err}");
            }
            print_bookings(&list);
            Ok(())
        }
        BookingsCmd::SetStatus { id, status, yes } => {
            let status: BookingStatus = status.parse().map_err(anyhow::Error::msg)?;
            let mut list = find_booking(api, session, page_size, id).await?;
            list.request_status_change(id, status);
            let Some(change) = list.pending_status() else {
                println!("Status unchanged.");
                return Ok(());
            };
            let prompt = format!(
                "Change status for {} ({} -> {})?",
                change.customer_name,
                change.old_status.as_str(),
                change.new_status.as_str()
            );
            if !yes && !confirm(&prompt) {
                list.cancel_status_change();
                println!("Cancelled.");
                return Ok(());
            }
            ensure_stay(list.confirm_status_change(api, session).await)?;
            if let Some(err) = list.error() {
                bail!("{err}");
            }
            println!("Status updated.");
            Ok(())
        }
        BookingsCmd::Delete { id, yes } => {
            let mut list = find_booking(api, session, page_size, id).await?;
            list.request_delete(id);
            if !yes && !confirm(&format!("Delete booking {id}?")) {
                list.cancel_delete();
                println!("Cancelled.");
                return Ok(());
            }
            ensure_stay(list.confirm_delete(api, session).await)?;
            if let Some(err) = list.error() {
                bail!("{err}");
            }
            println!("Deleted.");
            Ok(())
        }
    }
}

async fn company(api: &dyn TravelApi, session: &SessionStore, cmd: CompanyCmd) -> Result<()> {
    let mut form = CompanyForm::new();
    ensure_stay(form.fetch(api, session).await)?;
    if let Some(err) = form.error() {
        bail!("{err}");
    }

    match cmd {
        CompanyCmd::Show => {
            let info = form.fields();
            println!("Description: {}", info.description);
            println!("Address:     {}", info.address);
            println!("Phone:       {}", info.phone);
            println!("Email:       {}", info.email);
            println!("Telegram:    {}", info.telegram_link);
            println!("Instagram:   {}", info.instagram_link);
            println!("WhatsApp:    {}", info.whatsapp_link);
            Ok(())
        }
        CompanyCmd::Edit {
            description,
            address,
            phone,
            email,
            telegram,
            instagram,
            whatsapp,
        } => {
            let fields = form.fields_mut();
            if let Some(v) = description {
                fields.description = v;
            }
            if let Some(v) = address {
                fields.address = v;
            }
            if let Some(v) = phone {
                fields.phone = v;
            }
            if let Some(v) = email {
                fields.email = v;
            }
            if let Some(v) = telegram {
                fields.telegram_link = v;
            }
            if let Some(v) = instagram {
                fields.instagram_link = v;
            }
            if let Some(v) = whatsapp {
                fields.whatsapp_link = v;
            }

            if !form.has_changes() {
                println!("Nothing to update.");
                return Ok(());
            }
            ensure_stay(form.save(api, session).await)?;
            if let Some(err) = form.error() {
                bail!("{err}");
            }
            if let Some(message) = form.success() {
                println!("{message}");
            }
            Ok(())
        }
    }
}

/// Walk pages until the booking shows up on the current one; the list
/// mutations operate on loaded rows.
async fn find_booking(
    api: &dyn TravelApi,
    session: &SessionStore,
    page_size: u32,
    id: i64,
) -> Result<BookingList> {
    let mut list = BookingList::new(page_size);
    ensure_stay(list.fetch(api, session).await)?;
    if let Some(err) = list.error() {
        bail!("{err}");
    }
    loop {
        if list.rows().iter().any(|b| b.id == id) {
            return Ok(list);
        }
        if list.rows().is_empty() {
            bail!("booking {id} not found");
        }
        let before = list.current_page();
        ensure_stay(list.next_page(api, session).await)?;
        if list.current_page() == before {
            bail!("booking {id} not found");
        }
        if let Some(err) = list.error() {
            bail!("{err}");
        }
    }
}

fn print_offers(list: &OfferList) {
    if list.is_empty() {
        println!("No tour offers available.");
        return;
    }
    println!(
        "{:>5}  {:<25} {:<20} {:>10}  {:<10}  {:<10}  {}",
        "ID", "Title", "Hotel", "Price", "Start", "End", "Image"
    );
    for offer in list.rows() {
        println!(
            "{:>5}  {:<25} {:<20} {:>10}  {:<10}  {:<10}  {}",
            offer.id,
            offer.title,
            offer.hotel,
            offer.price,
            offer.start_date.to_string(),
            offer.end_date.to_string(),
            offer.image_url.as_deref().unwrap_or("(no image)")
        );
    }
    match list.total_pages() {
        Some(total) => println!(
            "Page {} of {} ({} offers total)",
            list.current_page(),
            total,
            list.total_count().unwrap_or_default()
        ),
        None => println!("Page {}", list.current_page()),
    }
}

fn print_bookings(list: &BookingList) {
    if list.is_empty() {
        println!("No bookings available.");
        return;
    }
    println!(
        "{:>5}  {:<22} {:<18} {:<10}  {:<10}  {:>9}  {:>3}  {:>3}  {}",
        "ID", "Customer", "Destination", "Start", "End", "Budget", "Ad", "Ch", "Status"
    );
    for b in list.rows() {
        println!(
            "{:>5}  {:<22} {:<18} {:<10}  {:<10}  {:>9}  {:>3}  {:>3}  {}",
            b.id,
            b.customer.full_name,
            b.description,
            b.date_start.to_string(),
            b.date_end.to_string(),
            b.budget.map(|v| v.to_string()).unwrap_or_else(|| "-".into()),
            b.adult_count,
            b.children_count,
            b.status.as_str()
        );
    }
    if let Some(total) = list.total_pages() {
        println!("Page {} of {}", list.current_page(), total);
    }
}

fn ensure_stay(nav: AdminNav) -> Result<()> {
    match nav {
        AdminNav::Stay => Ok(()),
        AdminNav::Login => bail_login(),
    }
}

fn bail_login() -> Result<()> {
    bail!("not logged in or session expired; run `tourdesk login`")
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N]: ");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes")
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{value}', expected YYYY-MM-DD"))
}
