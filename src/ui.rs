// UI layer: the interactive session built with `dialoguer`.
// It owns every prompt and every line printed to the terminal; the
// inventory itself only returns values and errors. Flows are small
// synchronous functions, one per menu entry.

use crate::config::Config;
use crate::error::InventoryError;
use crate::inventory::Inventory;
use crate::model::{Category, Product};
use crate::storage::{CredentialStore, InventoryBackend, JsonFileBackend};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

const MENU: &[&str] = &[
    "Print the products of a category",
    "Change the prices of a category",
    "Search product information",
    "Delete a product",
    "Delete a category and all its products",
    "Add a new product",
    "Add a new category",
    "Logout",
    "Exit",
];

/// How a menu session ended.
#[derive(Debug, PartialEq)]
enum SessionEnd {
    Logout,
    Exit,
}

/// Load the inventory, then alternate between login and the menu until
/// the user exits.
pub fn run(config: &Config) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Loading inventory...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    let loaded = Inventory::load(JsonFileBackend::new(&config.inventory_path));
    spinner.finish_and_clear();
    let mut inventory = loaded.with_context(|| {
        format!(
            "Failed to load inventory from {}",
            config.inventory_path.display()
        )
    })?;

    let credentials = CredentialStore::new(&config.credentials_path);
    loop {
        login(&credentials)?;
        if main_menu(&mut inventory)? == SessionEnd::Exit {
            break;
        }
    }
    Ok(())
}

/// Result of one login attempt.
#[derive(Debug, PartialEq)]
enum LoginOutcome {
    Accepted,
    Rejected,
    /// The credential document could not be read; the user may retry.
    Unavailable(String),
}

fn check_login(credentials: &CredentialStore, username: &str, password: &str) -> LoginOutcome {
    match credentials.authenticate(username, password) {
        Ok(true) => LoginOutcome::Accepted,
        Ok(false) => LoginOutcome::Rejected,
        Err(e) => {
            warn!(error = %e, "credential check failed");
            LoginOutcome::Unavailable(e.to_string())
        }
    }
}

/// Prompt for credentials until a valid pair is entered.
fn login(credentials: &CredentialStore) -> Result<()> {
    loop {
        let username: String = Input::new().with_prompt("Username").interact_text()?;
        let password: String = Password::new().with_prompt("Password").interact()?;
        match check_login(credentials, &username, &password) {
            LoginOutcome::Accepted => {
                info!(%username, "login");
                println!("{}\n", "Authenticated successfully".green());
                return Ok(());
            }
            LoginOutcome::Rejected => {
                warn!(%username, "rejected login");
                println!("\n{}\n", "Wrong username or password".red());
            }
            LoginOutcome::Unavailable(reason) => {
                println!("\n{}\n", format!("Cannot check credentials: {reason}").red());
            }
        }
    }
}

/// Menu loop for an authenticated user.
fn main_menu<B: InventoryBackend>(inventory: &mut Inventory<B>) -> Result<SessionEnd> {
    loop {
        let selection = Select::new()
            .with_prompt("Which operation do you want to run?")
            .items(MENU)
            .default(0)
            .interact()?;
        match selection {
            0 => handle_print_products(inventory)?,
            1 => handle_change_prices(inventory)?,
            2 => handle_search_product(inventory)?,
            3 => handle_delete_product(inventory)?,
            4 => handle_delete_category(inventory)?,
            5 => handle_add_product(inventory)?,
            6 => handle_add_category(inventory)?,
            7 => return Ok(SessionEnd::Logout),
            _ => return Ok(SessionEnd::Exit),
        }
        let more = Confirm::new()
            .with_prompt("Do you want to run another operation?")
            .default(false)
            .interact()?;
        if !more {
            return Ok(SessionEnd::Exit);
        }
    }
}

/// Let the user pick one of `names`. `None` when there is nothing to pick.
fn pick(prompt: &str, names: &[String]) -> Result<Option<String>> {
    if names.is_empty() {
        println!("{}", "Nothing to choose from".yellow());
        return Ok(None);
    }
    let i = Select::new()
        .with_prompt(prompt)
        .items(names)
        .default(0)
        .interact()?;
    Ok(Some(names[i].clone()))
}

/// Prompt validator: NaN and infinities parse as `f64` but cannot be stored.
fn finite(value: &f64) -> std::result::Result<(), &'static str> {
    if value.is_finite() {
        Ok(())
    } else {
        Err("Enter a finite number")
    }
}

fn report(err: InventoryError) {
    let msg = match &err {
        InventoryError::CategoryNotFound(_) | InventoryError::UnknownCategory(_) => {
            "This category does not exist".to_string()
        }
        InventoryError::ProductNotFound(_) => "This product does not exist".to_string(),
        InventoryError::DuplicateProduct { .. } => "This product already exists".to_string(),
        InventoryError::DuplicateCategory { .. } => "This category already exists".to_string(),
        InventoryError::InvalidPrice { .. } => format!("Invalid price: {}", err),
        InventoryError::Io { .. } | InventoryError::Parse { .. } => {
            format!("Changes were not saved: {}", err)
        }
    };
    if !err.is_domain() {
        warn!(error = %err, "storage failure");
    }
    println!("{}", msg.red());
}

fn print_product(p: &Product, with_category: bool) {
    let mut text = format!("\nProduct id: {}", p.id);
    if with_category {
        text.push_str(&format!("\nCategory id: {}", p.category_id));
    }
    text.push_str(&format!("\nName: {}\nPrice: {}", p.name, p.price));
    println!("{}", text.blue());
}

fn handle_print_products<B: InventoryBackend>(inventory: &Inventory<B>) -> Result<()> {
    let Some(name) = pick("Select the category", &inventory.list_category_names())? else {
        return Ok(());
    };
    let id = match inventory.resolve_category(&name) {
        Ok(id) => id,
        Err(e) => {
            report(e);
            return Ok(());
        }
    };
    match inventory.list_products_in_category(id) {
        Ok(list) if list.is_empty() => println!("{}", "No products in this category".yellow()),
        Ok(list) => list.into_iter().for_each(|p| print_product(p, false)),
        Err(e) => report(e),
    }
    Ok(())
}

fn handle_change_prices<B: InventoryBackend>(inventory: &mut Inventory<B>) -> Result<()> {
    let Some(name) = pick("Select the category", &inventory.list_category_names())? else {
        return Ok(());
    };
    let percent: f64 = Input::new()
        .with_prompt("Percentage")
        .validate_with(finite)
        .interact_text()?;
    let changes = inventory
        .resolve_category(&name)
        .and_then(|id| inventory.adjust_category_prices(id, percent));
    match changes {
        Ok(changes) => {
            for c in changes {
                println!(
                    "{}",
                    format!("\nChanging the price of {} (was {})", c.name, c.old_price).yellow()
                );
                println!("{}", format!("New price: {}", c.new_price).green());
            }
        }
        Err(e) => report(e),
    }
    Ok(())
}

fn handle_search_product<B: InventoryBackend>(inventory: &Inventory<B>) -> Result<()> {
    let Some(name) = pick("Product name", &inventory.list_product_names())? else {
        return Ok(());
    };
    match inventory.find_product_info(&name) {
        Ok(p) => print_product(p, true),
        Err(e) => report(e),
    }
    Ok(())
}

fn handle_delete_product<B: InventoryBackend>(inventory: &mut Inventory<B>) -> Result<()> {
    let Some(name) = pick("Product to delete", &inventory.list_product_names())? else {
        return Ok(());
    };
    match inventory.delete_product_by_name(&name) {
        Ok(p) => println!("{}", format!("Deleted product {}", p.name).red()),
        Err(e) => report(e),
    }
    Ok(())
}

fn handle_delete_category<B: InventoryBackend>(inventory: &mut Inventory<B>) -> Result<()> {
    let Some(name) = pick("Category to delete", &inventory.list_category_names())? else {
        return Ok(());
    };
    let deleted = inventory
        .resolve_category(&name)
        .and_then(|id| inventory.delete_category_cascade(id));
    match deleted {
        Ok(d) => println!(
            "{}",
            format!(
                "Deleted category {} and {} product(s)",
                d.category.name,
                d.products.len()
            )
            .red()
        ),
        Err(e) => report(e),
    }
    Ok(())
}

fn handle_add_product<B: InventoryBackend>(inventory: &mut Inventory<B>) -> Result<()> {
    let id: i64 = Input::new().with_prompt("Product id").interact_text()?;
    let category_id: i64 = Input::new().with_prompt("Category id").interact_text()?;
    let name: String = Input::new().with_prompt("Product name").interact_text()?;
    let price: f64 = Input::new()
        .with_prompt("Product price")
        .validate_with(finite)
        .interact_text()?;

    match inventory.add_product(Product::new(id, category_id, name, price)) {
        Ok(()) => println!("{}", "Product added".green()),
        Err(e) => report(e),
    }
    Ok(())
}

fn handle_add_category<B: InventoryBackend>(inventory: &mut Inventory<B>) -> Result<()> {
    let id: i64 = Input::new().with_prompt("Category id").interact_text()?;
    let name: String = Input::new().with_prompt("Category name").interact_text()?;

    match inventory.add_category(Category::new(id, name)) {
        Ok(()) => println!("{}", "Category added".green()),
        Err(e) => report(e),
    }
    Ok(())
}
