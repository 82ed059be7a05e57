//! Storefront commands.

use std::io::Write;

use clap::Args;

use catalogue_core::{Category, ProductId};
use catalogue_storefront::catalog::{CatalogController, SortKey};
use catalogue_storefront::product::{ProductCard, ProductDetail};
use catalogue_storefront::showrooms::active_showrooms;
use catalogue_storefront::store::StoreInfo;
use catalogue_storefront::wishlist::is_wishlisted;

use super::{CliError, Context, stdout};

#[derive(Args)]
pub struct CatalogArgs {
    /// Storefront URL to open, e.g. `/catalog?categories=men&page=2`
    #[arg(default_value = "/catalog")]
    href: String,

    /// Replace the search text
    #[arg(long)]
    search: Option<String>,

    /// Toggle a category by slug (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Toggle a color (repeatable)
    #[arg(long = "color")]
    colors: Vec<String>,

    /// Toggle a size (repeatable)
    #[arg(long = "size")]
    sizes: Vec<String>,

    /// Price ceiling
    #[arg(long)]
    max_price: Option<u32>,

    /// featured, price_low, price_high or newest
    #[arg(long)]
    sort: Option<String>,

    /// Clear every filter except the search text (applied first)
    #[arg(long)]
    clear: bool,

    /// Go to this page after the filters are applied
    #[arg(long)]
    page: Option<u32>,
}

pub async fn catalog(ctx: &Context, args: CatalogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = ctx.storefront.catalog(&args.href).await;

    if args.clear {
        page.clear_filters().await;
    }
    if let Some(search) = &args.search {
        page.set_search(search).await;
    }
    for slug in &args.categories {
        let id = Category::find_by_slug(page.categories(), slug)
            .map(|category| category.id)
            .ok_or_else(|| CliError::Refused(format!("Unknown category: {slug}")))?;
        page.toggle_category(id).await;
    }
    for color in &args.colors {
        page.toggle_color(color).await;
    }
    for size in &args.sizes {
        page.toggle_size(size).await;
    }
    if let Some(max_price) = args.max_price {
        page.set_max_price(max_price).await;
    }
    if let Some(sort) = &args.sort {
        let sort: SortKey = sort
            .parse()
            .map_err(|_| CliError::Refused(format!("Unknown sort: {sort}")))?;
        page.set_sort(sort).await;
    }
    if let Some(n) = args.page
        && !page.go_to_page(n).await
    {
        tracing::warn!(page = n, total_pages = page.total_pages(), "Page out of range");
    }

    Ok(render_catalog(&mut stdout(), ctx, &page)?)
}

fn render_catalog(out: &mut impl Write, ctx: &Context, page: &CatalogController) -> std::io::Result<()> {
    writeln!(out, "{}", page.location())?;
    writeln!(out, "{}", page.summary())?;
    writeln!(out)?;

    if page.products().is_empty() {
        writeln!(out, "No products found")?;
        return Ok(());
    }
    for product in page.products() {
        let card = ProductCard::new(product, ctx.api());
        let stock = if card.in_stock { "" } else { "  (out of stock)" };
        writeln!(out, "#{:<5} {:<40} {:>12}{stock}", card.id, card.name, card.price)?;
    }

    if page.total_pages() > 1 {
        let links: Vec<String> = page
            .page_links()
            .iter()
            .map(|link| {
                let label = link.to_string();
                if label == page.page().to_string() {
                    format!("[{label}]")
                } else {
                    label
                }
            })
            .collect();
        writeln!(out)?;
        writeln!(out, "Pages: {}", links.join(" "))?;
    }
    Ok(())
}

pub async fn product(ctx: &Context, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let id = ProductId::new(id);
    let detail = ProductDetail::load(ctx.api(), id).await?;
    let saved = is_wishlisted(ctx.api(), id).await;
    let product = &detail.product;

    let mut out = stdout();
    writeln!(out, "{}{}", product.name, if saved { "  ♥" } else { "" })?;
    writeln!(out, "{}", detail.price_label())?;
    if let Some(description) = &product.description {
        writeln!(out, "\n{description}")?;
    }
    writeln!(out)?;
    let colors = product.colors();
    if !colors.is_empty() {
        writeln!(out, "Colors: {}", colors.join(", "))?;
    }
    let sizes = product.sizes();
    if !sizes.is_empty() {
        writeln!(out, "Sizes:  {}", sizes.join(", "))?;
    }
    writeln!(out, "Stock:  {}", detail.total_stock())?;
    writeln!(out, "Images:")?;
    for url in &detail.image_urls {
        writeln!(out, "  {url}")?;
    }

    if !detail.related.is_empty() {
        writeln!(out, "\nYou may also like:")?;
        for related in &detail.related {
            writeln!(out, "  #{:<5} {} ({})", related.id, related.name, related.base_price)?;
        }
    }
    Ok(())
}

pub async fn wishlist(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_session()?;
    let mut page = ctx.storefront.wishlist();
    page.load().await;

    let mut out = stdout();
    if page.items().is_empty() {
        writeln!(out, "Your wishlist is empty")?;
    }
    for item in page.items() {
        writeln!(
            out,
            "#{:<5} {:<40} {:>12}",
            item.product_id, item.product.name, item.product.base_price
        )?;
    }
    Ok(())
}

pub async fn wishlist_add(ctx: &Context, product_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_session()?;
    let mut page = ctx.storefront.wishlist();
    page.add(ProductId::new(product_id)).await?;
    writeln!(stdout(), "Added to wishlist")?;
    Ok(())
}

pub async fn wishlist_remove(
    ctx: &Context,
    product_id: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_session()?;
    let mut page = ctx.storefront.wishlist();
    page.remove(ProductId::new(product_id)).await?;
    writeln!(stdout(), "Removed from wishlist")?;
    Ok(())
}

pub async fn wishlist_toggle(
    ctx: &Context,
    product_id: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_session()?;
    let mut page = ctx.storefront.wishlist();
    page.load().await;
    let saved = page.toggle(ProductId::new(product_id)).await?;
    let message = if saved {
        "Added to wishlist"
    } else {
        "Removed from wishlist"
    };
    writeln!(stdout(), "{message}")?;
    Ok(())
}

pub async fn showrooms(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let showrooms = active_showrooms(ctx.api()).await;

    let mut out = stdout();
    if showrooms.is_empty() {
        writeln!(out, "No showrooms found")?;
    }
    for showroom in &showrooms {
        writeln!(out, "{}", showroom.name)?;
        writeln!(out, "  {}", showroom.full_address())?;
        writeln!(out, "  {} | {}", showroom.phone, showroom.email)?;
        for (day, hours) in showroom.weekly_hours() {
            writeln!(out, "  {day:<10} {hours}")?;
        }
        if let Some(map_url) = &showroom.map_url {
            writeln!(out, "  {map_url}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub async fn store(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let info = StoreInfo::load(ctx.api()).await;

    let mut out = stdout();
    writeln!(out, "{}", info.name)?;
    for contact in [&info.email, &info.phone].into_iter().flatten() {
        writeln!(out, "  {contact}")?;
    }
    writeln!(out, "  Prices in {}", info.currency_symbol)?;
    if info.maintenance_mode {
        writeln!(out, "  The store is closed for maintenance")?;
    }
    Ok(())
}
