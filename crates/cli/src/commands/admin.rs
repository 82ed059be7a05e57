//! Admin console commands.
//!
//! # Usage
//!
//! ```bash
//! catalogue admin stats
//! catalogue admin products --search linen --page 2
//! catalogue admin delete-product 42 --yes
//! catalogue admin create-category "Home Decor"
//! catalogue admin category-image 3 ./banner.jpg
//! catalogue admin toggle-admin 7
//! catalogue admin set-setting products_per_page 36 maintenance_mode false
//! catalogue admin setting store_name
//! ```

use std::io::Write;

use clap::Subcommand;

use catalogue_admin::screens::dashboard;
use catalogue_admin::screens::{
    CategoriesScreen, CustomersScreen, ProductsScreen, SettingsScreen, ShowroomsScreen,
};
use catalogue_admin::{AdminAccess, AutoConfirm, Confirm, CrudError, check_access};
use catalogue_client::Upload;
use catalogue_core::{Category, CategoryId, ProductId, ShowroomId, UserId};

use super::{CliError, Context, confirm_on_stdin, stdout};

#[derive(Subcommand)]
pub enum AdminAction {
    /// Store-wide counts
    Stats,
    /// List products
    Products {
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Delete a product
    DeleteProduct {
        id: i64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// List categories
    Categories,
    /// Create a root category
    CreateCategory { name: String },
    /// Delete a category
    DeleteCategory {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },
    /// Upload a category image
    CategoryImage { id: i64, path: String },
    /// List showrooms, including inactive ones
    Showrooms,
    /// Delete a showroom
    DeleteShowroom {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },
    /// List customer accounts
    Customers,
    /// Grant or revoke admin rights
    ToggleAdmin { id: i64 },
    /// Activate or deactivate an account
    ToggleActive { id: i64 },
    /// Show store settings
    Settings,
    /// Show one store setting as stored
    Setting { key: String },
    /// Change settings: KEY VALUE pairs
    SetSetting {
        #[arg(num_args = 2.., value_names = ["KEY", "VALUE"])]
        pairs: Vec<String>,
    },
}

pub async fn run(ctx: &Context, action: AdminAction) -> Result<(), Box<dyn std::error::Error>> {
    match check_access(ctx.session()) {
        AdminAccess::Granted => {}
        AdminAccess::SignInRequired => return Err(CliError::SignInRequired.into()),
        AdminAccess::Forbidden => {
            return Err(CliError::Refused("Admin access required".to_string()).into());
        }
    }

    let api = ctx.api().clone();
    match action {
        AdminAction::Stats => {
            let stats = dashboard::load_stats(&api)
                .await
                .ok_or_else(|| CliError::Refused("Failed to load dashboard stats".to_string()))?;
            let mut out = stdout();
            for (label, count) in dashboard::cards(&stats) {
                writeln!(out, "{label:<18} {count}")?;
            }
        }
        AdminAction::Products { search, page } => {
            let screen = ProductsScreen::new(api);
            screen.search(&search).await;
            if page > 1 {
                screen.go_to_page(page).await;
            }
            let mut out = stdout();
            writeln!(
                out,
                "Page {} of {} ({} products)",
                screen.page(),
                screen.total_pages(),
                screen.total()
            )?;
            for product in screen.products() {
                let status = if product.is_active { "active" } else { "inactive" };
                writeln!(
                    out,
                    "#{:<5} {:<40} {:>12} stock {:<5} {status}",
                    product.id,
                    product.name,
                    product.base_price,
                    product.total_stock()
                )?;
            }
        }
        AdminAction::DeleteProduct { id, yes } => {
            let screen = ProductsScreen::new(api);
            screen.load().await;
            report(screen.delete(ProductId::new(id), confirmer(yes).as_ref()).await, "Product deleted")?;
        }
        AdminAction::Categories => {
            let screen = CategoriesScreen::new(api);
            screen.load().await;
            let mut out = stdout();
            for root in screen.categories() {
                for category in root.descendants() {
                    let indent = if category.parent_id.is_some() { "  " } else { "" };
                    writeln!(out, "{indent}#{:<5} {} ({})", category.id, category.name, category.slug)?;
                }
            }
        }
        AdminAction::CreateCategory { name } => {
            let screen = CategoriesScreen::new(api);
            let category = screen.create_named(&name).await?;
            writeln!(stdout(), "Created category #{} ({})", category.id, category.slug)?;
        }
        AdminAction::DeleteCategory { id, yes } => {
            let screen = CategoriesScreen::new(api);
            let result = screen
                .delete(CategoryId::new(id), confirmer(yes).as_ref())
                .await;
            report(result, "Category deleted")?;
        }
        AdminAction::CategoryImage { id, path } => {
            let image = Upload::from_path(&path).await?;
            let screen = CategoriesScreen::new(api);
            let category: Category = screen.upload_image(CategoryId::new(id), &image).await?;
            let url = category
                .image_url
                .as_deref()
                .map(|url| ctx.api().media_url(url))
                .unwrap_or_default();
            writeln!(stdout(), "Uploaded image for {}: {url}", category.name)?;
        }
        AdminAction::Showrooms => {
            let screen = ShowroomsScreen::new(api);
            screen.load().await;
            let mut out = stdout();
            for showroom in screen.showrooms() {
                let status = if showroom.is_active { "active" } else { "inactive" };
                writeln!(out, "#{:<5} {:<30} {:<20} {status}", showroom.id, showroom.name, showroom.city)?;
            }
        }
        AdminAction::DeleteShowroom { id, yes } => {
            let screen = ShowroomsScreen::new(api);
            let result = screen
                .delete(ShowroomId::new(id), confirmer(yes).as_ref())
                .await;
            report(result, "Showroom deleted")?;
        }
        AdminAction::Customers => {
            let screen = CustomersScreen::new(api);
            screen.load().await;
            let mut out = stdout();
            for user in screen.users() {
                let role = if user.is_superuser { "admin" } else { "customer" };
                let status = if user.is_active { "Active" } else { "Inactive" };
                let name = user.full_name.as_deref().unwrap_or("No Name");
                writeln!(out, "#{:<5} {name:<25} {:<35} {role:<9} {status}", user.id, user.email)?;
            }
        }
        AdminAction::ToggleAdmin { id } => {
            let screen = CustomersScreen::new(api);
            screen.load().await;
            let user = screen.toggle_admin(UserId::new(id)).await?;
            let role = if user.is_superuser { "now an admin" } else { "no longer an admin" };
            writeln!(stdout(), "{} is {role}", user.email)?;
        }
        AdminAction::ToggleActive { id } => {
            let screen = CustomersScreen::new(api);
            screen.load().await;
            let user = screen.toggle_active(UserId::new(id)).await?;
            let status = if user.is_active { "active" } else { "inactive" };
            writeln!(stdout(), "{} is now {status}", user.email)?;
        }
        AdminAction::Settings => {
            let mut screen = SettingsScreen::new(api);
            screen.load().await;
            let mut out = stdout();
            for (key, value) in screen.values() {
                writeln!(out, "{key:<28} {value}")?;
            }
        }
        AdminAction::Setting { key } => {
            let mut screen = SettingsScreen::new(api);
            screen.reload_field(&key).await?;
            let value = screen.get(&key).map(ToString::to_string).unwrap_or_default();
            writeln!(stdout(), "{key:<28} {value}")?;
        }
        AdminAction::SetSetting { pairs } => {
            let mut screen = SettingsScreen::new(api);
            screen.load().await;
            for pair in pairs.chunks(2) {
                if let [key, value] = pair {
                    screen.set(key, value)?;
                } else {
                    return Err(CliError::Refused(format!("Missing value for {}", pair.join(""))).into());
                }
            }
            if let [key, _] = pairs.as_slice() {
                screen.save_field(key).await?;
            } else {
                screen.save().await?;
            }
            writeln!(stdout(), "{}", screen.alert().unwrap_or_default())?;
        }
    }
    Ok(())
}

fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(confirm_on_stdin)
    }
}

/// Print `done` on success; a declined prompt is not an error.
fn report(result: Result<(), CrudError>, done: &str) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(()) => writeln!(stdout(), "{done}")?,
        Err(CrudError::Cancelled) => writeln!(stdout(), "Cancelled")?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
