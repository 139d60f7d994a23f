use clap::{Args, Parser, Subcommand, ValueEnum};
use sata_core::constants::{DEFAULT_DATA_DIR, DEFAULT_SLOT_NAME, DISPLAY_DATE_FORMAT};
use sata_core::format::{format_phone, format_postal_code, format_tax_id};
use sata_core::validation::{is_valid_health_card, is_valid_tax_id};
use sata_core::{
    config, CoreConfig, Field, JsonFileStore, ListingQuery, RegistryError, RegistryService,
    Resident, ResidentForm, SortOrder,
};
use sata_id::ResidentId;
use sata_types::AdmissionStatus;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sata")]
#[command(about = "SATA resident registry CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List residents
    List {
        /// Only residents with this status (internado or nao_internado)
        #[arg(long)]
        status: Option<AdmissionStatus>,
        /// Match against name, CPF and ward
        #[arg(long, default_value = "")]
        search: String,
        /// nome_asc, nome_desc, data_asc, data_desc, idade_asc or idade_desc
        #[arg(long, default_value = "nome_asc")]
        sort: SortOrder,
    },
    /// Show one resident
    Show {
        /// Resident ID
        id: ResidentId,
    },
    /// Register a new resident
    Create {
        #[command(flatten)]
        fields: ResidentArgs,
    },
    /// Edit a resident's personal details and address
    Edit {
        /// Resident ID
        id: ResidentId,
        #[command(flatten)]
        fields: ResidentArgs,
    },
    /// Record an admission
    Admit {
        /// Resident ID
        id: ResidentId,
        /// Entry date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long)]
        entry_date: Option<String>,
        /// Ward or room
        #[arg(long)]
        ward: Option<String>,
        #[arg(long)]
        bed: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a resident
    Delete {
        /// Resident ID
        id: ResidentId,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Apply an input mask
    Format {
        kind: FormatKind,
        value: String,
    },
    /// Check a document number
    Check {
        kind: CheckKind,
        value: String,
    },
}

/// Personal fields; on `edit`, omitted fields keep their stored value.
#[derive(Args)]
struct ResidentArgs {
    /// Full name
    #[arg(long)]
    name: Option<String>,
    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    birth_date: Option<String>,
    /// Masculino, Feminino or Outro
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    rg: Option<String>,
    #[arg(long)]
    cpf: Option<String>,
    /// Cartão SUS number
    #[arg(long)]
    sus: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    number: Option<String>,
    #[arg(long)]
    complement: Option<String>,
    #[arg(long)]
    city: Option<String>,
    /// Two-letter state code
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    cep: Option<String>,
}

impl ResidentArgs {
    fn apply_to(self, form: &mut ResidentForm) -> Result<(), RegistryError> {
        let entries = [
            (Field::Name, self.name),
            (Field::BirthDate, self.birth_date),
            (Field::Gender, self.gender),
            (Field::NationalId, self.rg),
            (Field::TaxId, self.cpf),
            (Field::HealthCard, self.sus),
            (Field::Phone, self.phone),
            (Field::Street, self.street),
            (Field::Number, self.number),
            (Field::Complement, self.complement),
            (Field::City, self.city),
            (Field::State, self.state),
            (Field::PostalCode, self.cep),
        ];
        for (field, value) in entries {
            if let Some(value) = value {
                form.set(field, &value)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatKind {
    Cpf,
    Phone,
    Cep,
}

#[derive(Clone, Copy, ValueEnum)]
enum CheckKind {
    Cpf,
    Sus,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("sata=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Format { kind, value }) => {
            let masked = match kind {
                FormatKind::Cpf => format_tax_id(&value),
                FormatKind::Phone => format_phone(&value),
                FormatKind::Cep => format_postal_code(&value),
            };
            println!("{masked}");
        }
        Some(Commands::Check { kind, value }) => {
            let valid = match kind {
                CheckKind::Cpf => is_valid_tax_id(&value),
                CheckKind::Sus => is_valid_health_card(&value),
            };
            if valid {
                println!("valid");
            } else {
                anyhow::bail!("invalid");
            }
        }
        Some(command) => {
            let cfg = Arc::new(resolve_config()?);
            let store = JsonFileStore::new(&cfg);
            tracing::debug!("using resident slot {}", store.path().display());
            let mut service = RegistryService::new(cfg, store);
            run(&mut service, command).map_err(report)?;
        }
        None => {
            println!("No command given. Use --help to see available commands.");
        }
    }

    Ok(())
}

fn resolve_config() -> anyhow::Result<CoreConfig> {
    let data_dir = std::env::var("SATA_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let slot_name = std::env::var("SATA_SLOT").unwrap_or_else(|_| DEFAULT_SLOT_NAME.into());
    let rules_path = std::env::var("SATA_ADMISSION_RULES").ok().map(PathBuf::from);
    let rules = config::admission_rules_from_path(rules_path.as_deref())?;

    Ok(CoreConfig::new(PathBuf::from(data_dir), slot_name, rules)?)
}

fn run(
    service: &mut RegistryService<JsonFileStore>,
    command: Commands,
) -> Result<(), RegistryError> {
    match command {
        Commands::List {
            status,
            search,
            sort,
        } => {
            let mut query = ListingQuery::new().with_search(search).with_sort(sort);
            if let Some(status) = status {
                query = query.with_status(status);
            }
            let residents = service.list(&query)?;
            if residents.is_empty() {
                println!("No residents found.");
            }
            for resident in residents {
                println!("{}", summary_line(&resident));
            }
        }
        Commands::Show { id } => {
            let resident = service.get(id)?;
            print_resident(&resident);
        }
        Commands::Create { fields } => {
            let mut form = ResidentForm::new();
            fields.apply_to(&mut form)?;
            let resident = service.create(&form)?;
            println!("Registered resident with ID: {}", resident.id);
        }
        Commands::Edit { id, fields } => {
            let mut form = service.form_for(id)?;
            fields.apply_to(&mut form)?;
            let resident = service.update(id, &form)?;
            println!("Updated resident {} (age {})", resident.id, resident.age);
        }
        Commands::Admit {
            id,
            entry_date,
            ward,
            bed,
            notes,
        } => {
            let mut form = service.admission_form_for(id)?;
            let entries = [
                (Field::EntryDate, entry_date),
                (Field::Ward, ward),
                (Field::Bed, bed),
                (Field::Notes, notes),
            ];
            for (field, value) in entries {
                if let Some(value) = value {
                    form.set(field, &value)?;
                }
            }
            let resident = service.admit(id, &form)?;
            println!("Recorded admission for resident {}", resident.id);
        }
        Commands::Delete { id, yes } => {
            if !yes {
                let resident = service.get(id)?;
                return Err(RegistryError::InvalidInput(format!(
                    "refusing to delete {} without --yes",
                    resident.personal.name
                )));
            }
            let removed = service.delete(id)?;
            println!("Deleted resident {} ({})", removed.id, removed.personal.name);
        }
        Commands::Format { .. } | Commands::Check { .. } => {}
    }
    Ok(())
}

/// Prints field errors one per line before handing the error to `main`.
fn report(err: RegistryError) -> anyhow::Error {
    match err {
        RegistryError::Validation(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("{}: {}", field.label(), message);
            }
            anyhow::anyhow!(errors.summary())
        }
        other => other.into(),
    }
}

fn summary_line(resident: &Resident) -> String {
    let entry = resident
        .entry_date()
        .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".into());
    format!(
        "{:>15}  {:<32} {:>3}  {:<14} {:<13} {:<10} {}",
        resident.id.to_string(),
        resident.personal.name.as_str(),
        resident.age,
        resident.personal.tax_id,
        resident.status().as_wire(),
        entry,
        resident.ward(),
    )
}

fn print_resident(resident: &Resident) {
    let personal = &resident.personal;
    let address = &resident.address;

    println!("ID: {}", resident.id);
    println!("Name: {}", personal.name);
    println!(
        "Birth date: {} (age {})",
        personal.birth_date.format(DISPLAY_DATE_FORMAT),
        resident.age
    );
    println!("Gender: {}", personal.gender.as_wire());
    println!("RG: {}", personal.national_id);
    println!("CPF: {}", personal.tax_id);
    println!("Cartão SUS: {}", personal.health_card);
    println!("Phone: {}", personal.phone);

    let mut street = format!("{}, {}", address.street, address.number);
    if let Some(complement) = &address.complement {
        street.push_str(" - ");
        street.push_str(complement);
    }
    println!("Address: {street}");
    println!(
        "City: {} / {} ({})",
        address.city,
        address.state.code(),
        address.postal_code
    );

    println!("Status: {}", resident.status().as_wire());
    if let Some(admission) = &resident.admission {
        if let Some(date) = admission.entry_date {
            println!("Entry date: {}", date.format(DISPLAY_DATE_FORMAT));
        }
        println!("Ward: {}", admission.ward);
        println!("Bed: {}", admission.bed);
        if !admission.notes.is_empty() {
            println!("Notes: {}", admission.notes);
        }
    }
}
