use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::{Parser, Subcommand};
use time::{PrimitiveDateTime, Time, macros::time};

use fintrack::{
    Alert, Budget, BudgetDraft, BudgetSummary, ClientConfig, DEFAULT_API_BASE_URL, Error, Gateway,
    RecordCache, SessionStore, Transaction, TransactionDraft, TransactionFilter, TransactionType,
    breakdown_view, budget_line, budget_summary_view, current_transaction_date, format_currency,
    init_logging, parse_currency, parse_transaction_date, totals_view, transaction_line,
};

/// A command-line client for the finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the finance tracker backend.
    #[arg(long, env = "FINTRACK_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// File path to the SQLite database the session is kept in.
    #[arg(long, env = "FINTRACK_STORAGE")]
    storage: Option<PathBuf>,

    /// How many seconds to wait for each response.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Log requests and responses in full.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store credentials for the backend. The password is prompted for.
    Login {
        /// The name to log in with.
        username: String,

        /// Ask the backend whether it accepts the credentials.
        #[arg(long)]
        verify: bool,
    },
    /// Forget the stored credentials.
    Logout,
    /// Show who is logged in.
    Whoami {
        /// Fetch the account profile from the backend.
        #[arg(long)]
        remote: bool,
    },
    /// Check that the backend can be reached.
    Status,
    /// Manage budgets.
    Budgets {
        #[command(subcommand)]
        command: BudgetCommand,
    },
    /// Manage transactions.
    Transactions {
        #[command(subcommand)]
        command: TransactionCommand,
    },
    /// Show income, expenses and spending per category.
    Breakdown,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// List every budget.
    List,
    /// Show one budget.
    Show { id: i64 },
    /// Create a budget.
    Create {
        name: String,
        category: String,
        /// The budget ceiling, e.g. "5000" or "$5,000.00".
        amount: String,
    },
    /// Change a budget. Fields that are not given keep their value.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        amount: Option<String>,
    },
    /// Delete a budget.
    Delete { id: i64 },
    /// Show the totals over all budgets.
    Summary {
        /// Compute the totals from the budget list instead of the summary endpoint.
        #[arg(long)]
        local: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TransactionCommand {
    /// List transactions.
    List {
        /// Only show INCOME, EXPENSE or ALL transactions.
        #[arg(long = "type", default_value = "all")]
        filter: TransactionFilter,

        /// Only show transactions in this category.
        #[arg(long, conflicts_with_all = ["budget", "from"])]
        category: Option<String>,

        /// Only show transactions linked to this budget.
        #[arg(long, conflicts_with = "from")]
        budget: Option<i64>,

        /// Only show transactions on or after this date.
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Only show transactions on or before this date.
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// Show one transaction.
    Show { id: i64 },
    /// Record a transaction.
    Create {
        description: String,
        /// The amount, always positive, e.g. "12.50".
        amount: String,
        category: String,
        /// INCOME or EXPENSE.
        #[arg(long = "type", default_value = "EXPENSE")]
        transaction_type: TransactionType,
        /// When the transaction happened, e.g. "2024-01-15" or
        /// "2024-01-15T10:30:00". Defaults to now.
        #[arg(long)]
        date: Option<String>,
        /// The budget the transaction counts towards.
        #[arg(long)]
        budget: Option<i64>,
        /// A link to the receipt.
        #[arg(long)]
        receipt: Option<String>,
    },
    /// Change a transaction. Fields that are not given keep their value.
    Update {
        id: i64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long = "type")]
        transaction_type: Option<TransactionType>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, conflicts_with = "unlink")]
        budget: Option<i64>,
        /// Remove the link to a budget.
        #[arg(long)]
        unlink: bool,
        #[arg(long)]
        receipt: Option<String>,
    },
    /// Delete a transaction.
    Delete { id: i64 },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] Error),

    #[error("could not read the password: {0}")]
    Prompt(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Client(error)) => report_error(error),
        Err(error @ CliError::Prompt(_)) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn report_error(error: Error) -> ExitCode {
    match error.into_alert() {
        Alert::RedirectToLogIn => {
            eprintln!("Your session has expired, log in again with `fintrack login <username>`.");
        }
        alert if alert.is_visible() => eprintln!("Error: {alert}"),
        _ => {}
    }

    ExitCode::FAILURE
}

async fn run(args: Args) -> Result<(), CliError> {
    let mut config = ClientConfig {
        api_base_url: args.api_url,
        request_timeout: Duration::from_secs(args.timeout),
        ..Default::default()
    };
    if let Some(storage) = args.storage {
        config.storage_path = storage;
    }

    let session = SessionStore::restore(config.open_storage()?)?;
    let gateway = Gateway::new(&config, session.clone())?;

    match args.command {
        Command::Login { username, verify } => {
            let password = rpassword::prompt_password("Password: ")?;
            session.log_in(&username, &password)?;

            if verify {
                let profile = gateway.current_user().await?;
                println!("Logged in as {} <{}>.", profile.username, profile.email);
            } else {
                println!("Logged in as {username}.");
            }
        }
        Command::Logout => {
            session.log_out()?;
            println!("Logged out.");
        }
        Command::Whoami { remote } => {
            if remote {
                let profile = gateway.current_user().await?;
                println!("{} <{}> ({})", profile.username, profile.email, profile.role);
            } else {
                match session.session()?.identity() {
                    Some(identity) => println!("{identity}"),
                    None => println!("Not logged in."),
                }
            }
        }
        Command::Status => {
            println!("{}", gateway.connection_status().await);
        }
        Command::Budgets { command } => run_budget_command(&gateway, command).await?,
        Command::Transactions { command } => run_transaction_command(&gateway, command).await?,
        Command::Breakdown => {
            let transactions = gateway.list_transactions().await?;
            println!("{}\n\n{}", totals_view(&transactions), breakdown_view(&transactions));
        }
    }

    Ok(())
}

async fn run_budget_command(gateway: &Gateway, command: BudgetCommand) -> Result<(), Error> {
    match command {
        BudgetCommand::List => {
            let budgets = gateway.list_budgets().await?;
            print_budgets(&budgets);
        }
        BudgetCommand::Show { id } => {
            let budget = gateway.get_budget(id).await?;
            println!("{}", budget_line(&budget));
        }
        BudgetCommand::Create {
            name,
            category,
            amount,
        } => {
            let draft = BudgetDraft::new(&name, &category, parse_currency(&amount)?)?;
            let budget = gateway.create_budget(&draft).await?;
            println!("{}", budget_line(&budget));
        }
        BudgetCommand::Update {
            id,
            name,
            category,
            amount,
        } => {
            let current = gateway.get_budget(id).await?.to_draft();
            let amount = match amount {
                Some(amount) => parse_currency(&amount)?,
                None => current.amount(),
            };
            let draft = BudgetDraft::new(
                name.as_deref().unwrap_or(current.name()),
                category.as_deref().unwrap_or(current.category()),
                amount,
            )?;

            let budget = gateway.update_budget(id, &draft).await?;
            println!("{}", budget_line(&budget));
        }
        BudgetCommand::Delete { id } => {
            gateway.delete_budget(id).await?;
            println!("Deleted budget #{id}.");
        }
        BudgetCommand::Summary { local } => {
            let summary = if local {
                BudgetSummary::from_budgets(&gateway.list_budgets().await?)
            } else {
                gateway.budget_summary().await?
            };
            println!("{}", budget_summary_view(&summary));
        }
    }

    Ok(())
}

async fn run_transaction_command(
    gateway: &Gateway,
    command: TransactionCommand,
) -> Result<(), Error> {
    let mut budgets = RecordCache::<Budget>::new();

    match command {
        TransactionCommand::List {
            filter,
            category,
            budget,
            from,
            to,
        } => {
            let transactions = match (category, budget, from, to) {
                (Some(category), _, _, _) => gateway.transactions_by_category(&category).await?,
                (None, Some(budget_id), _, _) => gateway.transactions_by_budget(budget_id).await?,
                (None, None, Some(from), Some(to)) => {
                    gateway
                        .transactions_by_date_range(
                            parse_transaction_date(&from)?,
                            parse_range_end(&to)?,
                        )
                        .await?
                }
                _ => match filter {
                    TransactionFilter::All => gateway.list_transactions().await?,
                    TransactionFilter::Income => {
                        gateway.transactions_by_type(TransactionType::Income).await?
                    }
                    TransactionFilter::Expense => {
                        gateway.transactions_by_type(TransactionType::Expense).await?
                    }
                },
            };
            budgets.replace_all(gateway.list_budgets().await?);

            let shown = filter.apply(&transactions);
            if shown.is_empty() {
                println!("No transactions.");
            }
            for transaction in &shown {
                println!("{}", transaction_line(transaction, budgets.records()));
            }
        }
        TransactionCommand::Show { id } => {
            let transaction = gateway.get_transaction(id).await?;
            budgets.replace_all(gateway.list_budgets().await?);
            println!("{}", transaction_line(&transaction, budgets.records()));
        }
        TransactionCommand::Create {
            description,
            amount,
            category,
            transaction_type,
            date,
            budget,
            receipt,
        } => {
            let transaction_date = match date {
                Some(date) => parse_transaction_date(&date)?,
                None => current_transaction_date(),
            };
            let draft = TransactionDraft::new(
                &description,
                parse_currency(&amount)?,
                &category,
                transaction_date,
                transaction_type,
            )?
            .budget(budget)
            .receipt_url(receipt.as_deref());

            let transaction = gateway.create_transaction(&draft).await?;
            print_saved_transaction(gateway, &transaction).await?;
        }
        TransactionCommand::Update {
            id,
            description,
            amount,
            category,
            transaction_type,
            date,
            budget,
            unlink,
            receipt,
        } => {
            let current = gateway.get_transaction(id).await?;
            let amount = match amount {
                Some(amount) => parse_currency(&amount)?,
                None => current.amount,
            };
            let transaction_date = match date {
                Some(date) => parse_transaction_date(&date)?,
                None => current.transaction_date,
            };
            let budget_id = if unlink {
                None
            } else {
                budget.or(current.budget_id)
            };
            let receipt = receipt.or(current.receipt_url);

            let draft = TransactionDraft::new(
                description.as_deref().unwrap_or(&current.description),
                amount,
                category.as_deref().unwrap_or(&current.category),
                transaction_date,
                transaction_type.unwrap_or(current.transaction_type),
            )?
            .budget(budget_id)
            .receipt_url(receipt.as_deref());

            let transaction = gateway.update_transaction(id, &draft).await?;
            print_saved_transaction(gateway, &transaction).await?;
        }
        TransactionCommand::Delete { id } => {
            gateway.delete_transaction(id).await?;
            println!("Deleted transaction #{id}.");
        }
    }

    Ok(())
}

fn print_budgets(budgets: &[Budget]) {
    if budgets.is_empty() {
        println!("No budgets.");
        return;
    }

    for budget in budgets {
        println!("{}", budget_line(budget));
    }
}

/// Print a saved transaction along with its budget's updated spending.
async fn print_saved_transaction(
    gateway: &Gateway,
    transaction: &Transaction,
) -> Result<(), Error> {
    let budgets: Vec<Budget> = gateway
        .get_linked_budget(transaction)
        .await?
        .into_iter()
        .collect();

    println!("{}", transaction_line(transaction, &budgets));

    if let Some(budget) = budgets.first() {
        println!(
            "{} now has {} of {} left.",
            budget.name,
            format_currency(budget.remaining()),
            format_currency(budget.amount)
        );
    }

    Ok(())
}

/// Like [parse_transaction_date], but a plain date means the end of that day.
fn parse_range_end(text: &str) -> Result<PrimitiveDateTime, Error> {
    let date_time = parse_transaction_date(text)?;

    if !text.contains('T') && date_time.time() == Time::MIDNIGHT {
        Ok(date_time.replace_time(time!(23:59:59)))
    } else {
        Ok(date_time)
    }
}
