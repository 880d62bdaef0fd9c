use blogicum_server::application::taxonomy_service::TaxonomyService;
use blogicum_server::application::user_service::UserService;
use blogicum_server::data::Repositories;
use blogicum_server::domain::category::NewCategory;
use blogicum_server::domain::error::DomainError;
use blogicum_server::domain::location::NewLocation;
use blogicum_server::infrastructure::config::database_url_from_env;
use blogicum_server::infrastructure::database::{create_pool, run_migrations};
use clap::{Parser, Subcommand};

/// Site administration: taxonomy and accounts.
#[derive(Parser, Debug)]
#[clap(name = "blogicum-cli")]
struct Cli {
    /// Defaults to `DATABASE_URL`.
    #[clap(long)]
    database_url: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[clap(subcommand)]
    Category(CategoryCommand),
    #[clap(subcommand)]
    Location(LocationCommand),
    #[clap(subcommand)]
    User(UserCommand),
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    Add {
        #[clap(long)]
        title: String,
        #[clap(long)]
        description: String,
        #[clap(long)]
        slug: String,
        /// Create the category hidden.
        #[clap(long)]
        unpublished: bool,
    },
    List,
    Publish {
        slug: String,
    },
    Unpublish {
        slug: String,
    },
    /// Posts of the category stay, without a category.
    Remove {
        slug: String,
    },
}

#[derive(Subcommand, Debug)]
enum LocationCommand {
    Add {
        #[clap(long)]
        name: String,
        #[clap(long)]
        unpublished: bool,
    },
    List,
    Publish {
        id: i64,
    },
    Unpublish {
        id: i64,
    },
    Remove {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    List,
    /// Also removes every post and comment of the user.
    Remove {
        username: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let database_url = args
        .database_url
        .or_else(database_url_from_env)
        .ok_or("DATABASE_URL is not set")?;
    let pool = create_pool(&database_url, 2).await?;
    run_migrations(&pool).await?;

    let repos = Repositories::postgres(pool);
    let taxonomy = TaxonomyService::new(repos.categories.clone(), repos.locations.clone());
    let users = UserService::new(repos.users.clone());

    match args.command {
        Command::Category(command) => run_category(&taxonomy, command).await.map_err(explain)?,
        Command::Location(command) => run_location(&taxonomy, command).await.map_err(explain)?,
        Command::User(command) => run_user(&users, command).await.map_err(explain)?,
    }

    Ok(())
}

async fn run_category(taxonomy: &TaxonomyService, command: CategoryCommand) -> Result<(), DomainError> {
    match command {
        CategoryCommand::Add {
            title,
            description,
            slug,
            unpublished,
        } => {
            let category = taxonomy
                .create_category(NewCategory {
                    title,
                    description,
                    slug,
                    is_published: !unpublished,
                })
                .await?;
            println!("Category created: {} ({})", category.slug, category.title);
        }
        CategoryCommand::List => {
            let categories = taxonomy.list_categories().await?;
            println!("Categories ({})", categories.len());
            for category in categories {
                println!(
                    "- {} {} [{}]",
                    category.slug,
                    category.title,
                    published_label(category.is_published)
                );
            }
        }
        CategoryCommand::Publish { slug } => {
            taxonomy.set_category_published(&slug, true).await?;
            println!("Category published: {}", slug);
        }
        CategoryCommand::Unpublish { slug } => {
            taxonomy.set_category_published(&slug, false).await?;
            println!("Category hidden: {}", slug);
        }
        CategoryCommand::Remove { slug } => {
            taxonomy.delete_category(&slug).await?;
            println!("Category removed: {}", slug);
        }
    }
    Ok(())
}

async fn run_location(taxonomy: &TaxonomyService, command: LocationCommand) -> Result<(), DomainError> {
    match command {
        LocationCommand::Add { name, unpublished } => {
            let location = taxonomy
                .create_location(NewLocation {
                    name,
                    is_published: !unpublished,
                })
                .await?;
            println!("Location created! ID: {}", location.id);
        }
        LocationCommand::List => {
            let locations = taxonomy.list_locations().await?;
            println!("Locations ({})", locations.len());
            for location in locations {
                println!(
                    "- [{}] {} [{}]",
                    location.id,
                    location.name,
                    published_label(location.is_published)
                );
            }
        }
        LocationCommand::Publish { id } => {
            taxonomy.set_location_published(id, true).await?;
            println!("Location published: {}", id);
        }
        LocationCommand::Unpublish { id } => {
            taxonomy.set_location_published(id, false).await?;
            println!("Location hidden: {}", id);
        }
        LocationCommand::Remove { id } => {
            taxonomy.delete_location(id).await?;
            println!("Location removed: {}", id);
        }
    }
    Ok(())
}

async fn run_user(users: &UserService, command: UserCommand) -> Result<(), DomainError> {
    match command {
        UserCommand::List => {
            let all = users.list().await?;
            println!("Users ({})", all.len());
            for user in all {
                println!("- {} <{}> joined {}", user.username, user.email, user.created_at);
            }
        }
        UserCommand::Remove { username } => {
            users.delete_by_username(&username).await?;
            println!("User removed: {}", username);
        }
    }
    Ok(())
}

fn published_label(is_published: bool) -> &'static str {
    if is_published { "published" } else { "hidden" }
}

/// Field errors are the useful part of a rejected form.
fn explain(err: DomainError) -> Box<dyn std::error::Error> {
    match err {
        DomainError::Validation(fields) => format!(
            "validation failed: {}",
            serde_json::to_string(&fields).unwrap_or_default()
        )
        .into(),
        other => Box::new(other),
    }
}
