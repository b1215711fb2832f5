//! Command layer bridging the CLI shell to the view models and client.
//!
//! Protected commands consult the route guard first, the way the web
//! frontend gates protected routes, and report the login redirect
//! instead of calling the API.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::models::{Profile, ProfileUpdate, SalesSummary, UploadRecord};
use crate::routes::{Resolution, Route, RouteGuard};
use crate::storage::Database;
use crate::views::{
    HomeView, LoginView, Outcome, RegisterView, SettingsView, UploadView, ViewLifetime,
    NO_DATA_MESSAGE,
};

pub struct AppState {
    pub db: Arc<Database>,
    pub api: ApiClient,
    pub guard: RouteGuard,
}

/// Guard precheck shared by protected commands. Returns false (after
/// telling the user) when the route resolves to a login redirect.
async fn ensure_route(state: &AppState, route: Route) -> bool {
    match state.guard.resolve(route).await {
        Resolution::Render(_) => true,
        Resolution::Redirect(target) => {
            if target == Route::Login {
                println!("Not signed in. Run `datus login <username> <password>` first.");
            } else {
                println!("Redirected to {}", target.path());
            }
            false
        }
    }
}

/// One place that notices a session lost mid-command: the command was
/// allowed through the guard, so a redirect afterwards means the server
/// rejected the token and the observer cleared it.
async fn notice_if_session_lost(state: &AppState, route: Route) {
    if let Resolution::Redirect(Route::Login) = state.guard.resolve(route).await {
        println!("Your session is no longer valid. Please sign in again with `datus login`.");
    }
}

pub async fn login(
    state: &AppState,
    username: String,
    password: String,
    remember_me: bool,
) -> Result<()> {
    let mut view = LoginView::new();
    view.username = username;
    view.password = password;
    view.remember_me = remember_me;

    let lifetime = ViewLifetime::new();
    let mut handle = lifetime.handle();

    match view.submit(&state.api, &mut handle).await {
        Outcome::Navigate(route) => {
            println!("Signed in. ({})", route.path());
            Ok(())
        }
        _ => {
            let message = view.error.unwrap_or_else(|| "Login failed".to_string());
            anyhow::bail!(message)
        }
    }
}

pub async fn register(
    state: &AppState,
    email: String,
    username: String,
    password: String,
) -> Result<()> {
    let mut view = RegisterView::new();
    view.email = email;
    view.username = username;
    // A single password argument stands in for both form fields.
    view.confirm_password = password.clone();
    view.password = password;

    let lifetime = ViewLifetime::new();
    let mut handle = lifetime.handle();

    match view.submit(&state.api, &mut handle).await {
        Outcome::Navigate(route) => {
            println!("Account created and signed in. ({})", route.path());
            Ok(())
        }
        _ => {
            let message = view
                .error
                .unwrap_or_else(|| "Registration failed".to_string());
            anyhow::bail!(message)
        }
    }
}

pub async fn logout(state: &AppState) -> Result<()> {
    state.api.session().clear().await?;
    tracing::info!("Session token cleared");
    println!("Signed out.");
    Ok(())
}

pub async fn upload(state: &AppState, file: &Path) -> Result<()> {
    if !ensure_route(state, Route::UploadSales).await {
        return Ok(());
    }

    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", file.display()))?
        .to_string();
    let bytes = tokio::fs::read(file).await?;
    let size_bytes = bytes.len() as i64;

    let mut view = UploadView::new();
    view.select_file(filename.clone(), bytes);

    let lifetime = ViewLifetime::new();
    let mut handle = lifetime.handle();
    view.submit(&state.api, &mut handle).await;

    if let Some(summary) = &view.summary {
        if let Some(message) = &view.success {
            println!("{}", message);
        }
        print_summary(summary);

        let record = UploadRecord::new(&filename, size_bytes, summary);
        state.db.record_upload(&record).await?;
        return Ok(());
    }

    notice_if_session_lost(state, Route::UploadSales).await;
    anyhow::bail!(view.error.unwrap_or_else(|| "Upload failed".to_string()))
}

pub async fn summary(state: &AppState, id: Option<String>) -> Result<()> {
    if !ensure_route(state, Route::Home).await {
        return Ok(());
    }

    let result = match id {
        Some(id) => state.api.fetch_summary(&id).await.map(Some),
        None => state.api.get_summary().await,
    };

    match result {
        Ok(Some(summary)) => {
            print_summary(&summary);
            Ok(())
        }
        Ok(None) => {
            println!("{}", NO_DATA_MESSAGE);
            Ok(())
        }
        Err(e) => {
            notice_if_session_lost(state, Route::Home).await;
            anyhow::bail!(e.user_message())
        }
    }
}

pub async fn stats(state: &AppState) -> Result<()> {
    if !ensure_route(state, Route::Home).await {
        return Ok(());
    }

    let mut view = HomeView::new();
    let lifetime = ViewLifetime::new();
    let mut handle = lifetime.handle();
    view.refresh(&state.api, &mut handle).await;

    match view.stats {
        Some(stats) if !stats.is_empty() => {
            println!("Total sales:       ${:.2}", stats.total_sales);
            println!(
                "Top product:       {}",
                stats.best_selling_product.as_deref().unwrap_or("None")
            );
            println!("Avg monthly sales: ${:.2}", stats.avg_sales_by_month);
            print_series("Sales by month", &stats.sales_by_month_x, &stats.sales_by_month_y);
            print_series("Product sales", &stats.product_sales_x, &stats.product_sales_y);
            print_series("Total sales", &stats.total_sales_x, &stats.total_sales_y);
            Ok(())
        }
        Some(_) => {
            println!("{}", NO_DATA_MESSAGE);
            Ok(())
        }
        None => {
            notice_if_session_lost(state, Route::Home).await;
            anyhow::bail!(view.error.unwrap_or_else(|| "Failed to fetch stats".to_string()))
        }
    }
}

pub async fn data(state: &AppState) -> Result<()> {
    let value = state.api.get_data().await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub async fn profile_show(state: &AppState) -> Result<()> {
    if !ensure_route(state, Route::Settings).await {
        return Ok(());
    }

    let mut view = SettingsView::new();
    let lifetime = ViewLifetime::new();
    let mut handle = lifetime.handle();
    view.load(&state.api, &mut handle).await;

    match view.profile {
        Some(profile) => {
            print_profile(&profile);
            Ok(())
        }
        None => {
            notice_if_session_lost(state, Route::Settings).await;
            anyhow::bail!(view
                .error
                .unwrap_or_else(|| "Failed to fetch profile".to_string()))
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn profile_update(
    state: &AppState,
    first_name: Option<String>,
    last_name: Option<String>,
    company_name: Option<String>,
    gender: Option<String>,
    mobile_number: Option<String>,
    picture: Option<&Path>,
) -> Result<()> {
    if !ensure_route(state, Route::Settings).await {
        return Ok(());
    }

    let profile_picture = match picture {
        Some(path) => {
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow::anyhow!("Invalid picture path: {}", path.display()))?
                .to_string();
            let bytes = tokio::fs::read(path).await?;
            Some((filename, bytes))
        }
        None => None,
    };

    let mut view = SettingsView::new();
    view.draft = ProfileUpdate {
        first_name,
        last_name,
        company_name,
        gender,
        mobile_number,
        profile_picture,
    };

    let lifetime = ViewLifetime::new();
    let mut handle = lifetime.handle();
    view.submit(&state.api, &mut handle).await;

    match (&view.success, view.profile.as_ref()) {
        (Some(message), Some(profile)) => {
            println!("{}", message);
            print_profile(profile);
            Ok(())
        }
        _ => {
            notice_if_session_lost(state, Route::Settings).await;
            anyhow::bail!(view
                .error
                .unwrap_or_else(|| "Profile update failed".to_string()))
        }
    }
}

pub async fn history(state: &AppState, limit: i64) -> Result<()> {
    let records = state.db.recent_uploads(limit).await?;
    if records.is_empty() {
        println!("No uploads yet.");
        return Ok(());
    }

    for record in records {
        let when = chrono::DateTime::from_timestamp(record.uploaded_at, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| record.uploaded_at.to_string());
        println!(
            "{}  {:<30} {:>8} rows  ${:>12.2}",
            when, record.filename, record.total_rows, record.total_sales
        );
    }
    Ok(())
}

pub async fn status(state: &AppState) -> Result<()> {
    let auth_state = state.guard.auth_state().await;
    println!("Session: {:?}", auth_state);
    match state.guard.resolve(Route::Home).await {
        Resolution::Render(route) => println!("Home route: renders {}", route.path()),
        Resolution::Redirect(route) => println!("Home route: redirects to {}", route.path()),
    }
    Ok(())
}

fn print_summary(summary: &SalesSummary) {
    println!("Total rows:    {}", summary.summary.total_rows);
    println!("Total sales:   ${:.2}", summary.summary.total_sales);
    println!(
        "Date range:    {} - {}",
        summary.summary.start_date, summary.summary.end_date
    );
    println!("Best month:    {}", summary.summary_month.best_month);
    println!(
        "Avg per month: ${:.2}",
        summary.summary_month.avg_sales_by_month
    );
    println!(
        "Top product:   {} ({} units)",
        summary.summary_products.highest_selling_product,
        summary.summary_products.best_selling_quantity
    );
    println!(
        "Highest sale:  ${:.2}",
        summary.summary_sales.highest_sale_recorded
    );
    if let Some(message) = &summary.summary_trends.summary_message {
        println!("Trend:         {}", message);
    }
}

fn print_profile(profile: &Profile) {
    println!("Username:   {}", profile.username);
    println!("Email:      {}", profile.email);
    println!("Name:       {} {}", profile.first_name, profile.last_name);
    println!("Company:    {}", profile.company_name);
    println!("Gender:     {}", profile.gender);
    println!("Mobile:     {}", profile.mobile_number);
    if let Some(picture) = &profile.profile_picture {
        println!("Picture:    {}", picture);
    }
}

fn print_series(label: &str, x: &[String], y: &[f64]) {
    if x.is_empty() {
        return;
    }
    println!("{}:", label);
    for (label, value) in x.iter().zip(y.iter()) {
        println!("  {:<12} {:.2}", label, value);
    }
}
