//! intake CLI
//!
//! Command-line front end for the patient intake forms.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use intake_app::patients::render_patients;
use intake_app::registration::{contact_fields, RegistrationForm};
use intake_app::service::{InMemoryPatientService, PatientService};
use intake_app::AppConfig;
use intake_forms::{RecordingNavigator, SubmissionOutcome, SubmitOutcome};
use intake_table::GatedView;

/// Patient intake forms.
#[derive(Parser)]
#[command(name = "intake")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Passkey expected by the patient table.
    #[arg(long, env = "INTAKE_ADMIN_PASSKEY", hide_env_values = true)]
    admin_passkey: Option<String>,

    /// Rows per page of the patient table.
    #[arg(long, default_value_t = intake_table::DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// JSON file holding registered patients.
    #[arg(short, long, env = "INTAKE_STORE", default_value = intake_app::config::DEFAULT_STORE)]
    store: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the registration form as HTML.
    Render {
        /// Only the name, email and phone fields.
        #[arg(long)]
        contact_only: bool,
    },

    /// Submit a JSON file of form values.
    Register {
        /// JSON object keyed by field name.
        #[arg(long)]
        values: PathBuf,
    },

    /// Print the patient table.
    Patients {
        /// Access key as kept in browser storage (base64).
        #[arg(long)]
        access_key: Option<String>,

        /// Page to show, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

impl Cli {
    fn config(&self) -> AppConfig {
        AppConfig {
            admin_passkey: self.admin_passkey.clone(),
            page_size: self.page_size,
            store: self.store.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.config();
    let service = Arc::new(
        InMemoryPatientService::open(&config.store)
            .await
            .with_context(|| format!("opening patient store {}", config.store.display()))?,
    );
    let navigator = Arc::new(RecordingNavigator::new());

    match cli.command {
        Commands::Render { contact_only } => {
            let form = if contact_only {
                RegistrationForm::with_fields(service, navigator, contact_fields())?
            } else {
                RegistrationForm::new(service, navigator)?
            };
            println!("{}", form.form().render_html("/patients", "Get Started"));
        }

        Commands::Register { values } => {
            let raw = tokio::fs::read_to_string(&values)
                .await
                .with_context(|| format!("reading {}", values.display()))?;
            let form = RegistrationForm::new(service, navigator.clone())?;
            form.load_json(&raw)?;

            match form.submit() {
                SubmitOutcome::Invalid(errors) => {
                    for (field, message) in errors.iter() {
                        eprintln!("{field}: {message}");
                    }
                    bail!("form has {} invalid field(s)", errors.len());
                }
                SubmitOutcome::Busy => bail!("a submission is already in flight"),
                SubmitOutcome::Started(submission) => match submission.await {
                    SubmissionOutcome::Succeeded { id, path } => {
                        info!(%id, "patient registered");
                        println!("{path}");
                    }
                    SubmissionOutcome::NoRecord => info!("no patient record was returned"),
                    SubmissionOutcome::Failed => bail!("registration failed"),
                    SubmissionOutcome::Detached => bail!("form closed before registration finished"),
                },
            }
        }

        Commands::Patients { access_key, page } => {
            let Some(gate) = config.access_gate() else {
                bail!("no admin passkey configured (--admin-passkey or INTAKE_ADMIN_PASSKEY)");
            };
            let records = service.list_users().await?;

            match render_patients(
                &gate,
                access_key.as_deref(),
                &records,
                config.page_size,
                page.saturating_sub(1),
            )? {
                GatedView::Table(html) => println!("{html}"),
                GatedView::Redirect(route) => {
                    info!(%route, "access key rejected");
                    println!("redirect: {route}");
                }
            }
        }
    }

    Ok(())
}
