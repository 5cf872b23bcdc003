//! Interactive session: an auth screen until someone signs in, then a
//! weather screen until they log out.

use anyhow::Context;
use inquire::{CustomType, InquireError, Password, Select, Text};
use skywatch_core::{
    CredentialStore, FetchError, LoginForm, RegistrationForm, WeatherProvider, WeatherQuery,
    WeatherReport,
};
use std::fmt;

use crate::render::Card;

enum Step {
    Continue,
    Quit,
}

enum Prompted<T> {
    Value(T),
    Back,
    Quit,
}

/// Esc goes back to the menu, Ctrl-C ends the session.
fn prompted<T>(result: Result<T, InquireError>) -> anyhow::Result<Prompted<T>> {
    match result {
        Ok(value) => Ok(Prompted::Value(value)),
        Err(InquireError::OperationCanceled) => Ok(Prompted::Back),
        Err(InquireError::OperationInterrupted) => Ok(Prompted::Quit),
        Err(err) => Err(err).context("Failed to read input"),
    }
}

macro_rules! ask {
    ($prompt:expr) => {
        match prompted($prompt)? {
            Prompted::Value(value) => value,
            Prompted::Back => return Ok(Step::Continue),
            Prompted::Quit => return Ok(Step::Quit),
        }
    };
}

#[derive(Debug, Clone, Copy)]
enum AuthAction {
    SignIn,
    CreateAccount,
    Quit,
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthAction::SignIn => "Sign in",
            AuthAction::CreateAccount => "Create account",
            AuthAction::Quit => "Quit",
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum WeatherAction {
    SearchCity,
    CurrentLocation,
    ToggleActivities { expanded: bool },
    Logout,
    Quit,
}

impl fmt::Display for WeatherAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeatherAction::SearchCity => "Search for a city",
            WeatherAction::CurrentLocation => "Current location",
            WeatherAction::ToggleActivities { expanded: true } => "Hide activities",
            WeatherAction::ToggleActivities { expanded: false } => "Show activities",
            WeatherAction::Logout => "Logout",
            WeatherAction::Quit => "Quit",
        })
    }
}

fn success(message: &str) {
    println!("[ok] {message}");
}

fn failure(message: &str) {
    println!("[error] {message}");
}

/// What to tell the user when a lookup fails.
fn fetch_error_message(query: &WeatherQuery, err: &FetchError) -> String {
    match (err, query) {
        (FetchError::InvalidCoordinates, _) => "Unable to retrieve your location".to_string(),
        (FetchError::Api { message, .. }, WeatherQuery::City(_)) => {
            message
                .clone()
                .unwrap_or_else(|| "City not found!".to_string())
        }
        (FetchError::Api { .. }, WeatherQuery::Coordinates { .. }) => {
            "Failed to fetch weather data for your location".to_string()
        }
        (FetchError::Request(_) | FetchError::Parse(_), _) => {
            "Failed to fetch weather data. Please try again.".to_string()
        }
    }
}

/// Composition root for a session: owns the account store and the provider.
pub struct App {
    store: CredentialStore,
    provider: Box<dyn WeatherProvider>,
    /// Last successfully shown city; fetched again on every login.
    city: String,
    report: Option<WeatherReport>,
    show_activities: bool,
}

impl App {
    pub fn new(provider: Box<dyn WeatherProvider>, city: String) -> Self {
        Self {
            store: CredentialStore::new(),
            provider,
            city,
            report: None,
            show_activities: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            let step = if self.store.is_logged_in() {
                self.weather_screen().await?
            } else {
                self.auth_screen().await?
            };

            if let Step::Quit = step {
                return Ok(());
            }
        }
    }

    async fn auth_screen(&mut self) -> anyhow::Result<Step> {
        let actions = vec![
            AuthAction::SignIn,
            AuthAction::CreateAccount,
            AuthAction::Quit,
        ];
        let action = ask!(Select::new("Weather App", actions).prompt());

        match action {
            AuthAction::SignIn => self.sign_in().await,
            AuthAction::CreateAccount => self.create_account(),
            AuthAction::Quit => Ok(Step::Quit),
        }
    }

    async fn sign_in(&mut self) -> anyhow::Result<Step> {
        let email = ask!(Text::new("Email:").prompt());
        let password = ask!(Password::new("Password:").without_confirmation().prompt());

        let form = LoginForm { email, password };
        if let Err(err) = form.validate() {
            failure(&err.to_string());
            return Ok(Step::Continue);
        }

        if !self.store.login(&form.email, &form.password) {
            failure("Invalid email or password");
            return Ok(Step::Continue);
        }

        success("Welcome back!");
        self.fetch(WeatherQuery::city(self.city.clone())).await;
        Ok(Step::Continue)
    }

    fn create_account(&mut self) -> anyhow::Result<Step> {
        let name = ask!(Text::new("Full name:").prompt());
        let email = ask!(Text::new("Email:").prompt());
        let password = ask!(Password::new("Password:").without_confirmation().prompt());
        let confirm = Password::new("Confirm password:").without_confirmation();
        let confirm_password = ask!(confirm.prompt());

        let form = RegistrationForm {
            name,
            email,
            password,
            confirm_password,
        };
        if let Err(err) = form.validate() {
            failure(&err.to_string());
            return Ok(Step::Continue);
        }

        if self.store.register(&form.email, &form.password, &form.name) {
            success("Registration successful! Please login.");
        } else {
            failure("Email already registered");
        }
        Ok(Step::Continue)
    }

    async fn weather_screen(&mut self) -> anyhow::Result<Step> {
        let greeting = match self.store.current_user() {
            Some(user) => format!("Welcome, {}", user.name),
            None => return Ok(Step::Continue),
        };

        let mut actions = vec![WeatherAction::SearchCity, WeatherAction::CurrentLocation];
        if self.report.is_some() {
            actions.push(WeatherAction::ToggleActivities {
                expanded: self.show_activities,
            });
        }
        actions.extend([WeatherAction::Logout, WeatherAction::Quit]);

        let action = ask!(Select::new(&greeting, actions).prompt());

        match action {
            WeatherAction::SearchCity => {
                let search = Text::new("City:").with_placeholder("Search for a city...");
                let term = ask!(search.prompt());
                let term = term.trim();
                if !term.is_empty() {
                    self.fetch(WeatherQuery::city(term)).await;
                }
            }
            WeatherAction::CurrentLocation => {
                let latitude = ask!(CustomType::<f64>::new("Latitude:").prompt());
                let longitude = ask!(CustomType::<f64>::new("Longitude:").prompt());
                let query = WeatherQuery::coordinates(latitude, longitude);
                self.fetch(query).await;
            }
            WeatherAction::ToggleActivities { .. } => {
                self.show_activities = !self.show_activities;
                if let Some(report) = &self.report {
                    println!("{}", Card::new(report, self.show_activities));
                }
            }
            WeatherAction::Logout => {
                self.store.logout();
                self.report = None;
                self.show_activities = false;
            }
            WeatherAction::Quit => return Ok(Step::Quit),
        }

        Ok(Step::Continue)
    }

    /// One lookup; on failure the previous report stays in place.
    async fn fetch(&mut self, query: WeatherQuery) {
        println!("Loading weather data...");

        let reading = match self.provider.current(&query).await {
            Ok(reading) => reading,
            Err(err) => {
                tracing::warn!(%query, error = %err, "weather lookup failed");
                failure(&fetch_error_message(&query, &err));
                return;
            }
        };

        match &query {
            WeatherQuery::City(name) => self.city = name.clone(),
            WeatherQuery::Coordinates { .. } => {
                self.city = reading.location_name.clone();
                success("Weather updated for your current location");
            }
        }

        let report = WeatherReport::from_reading(&reading);
        println!("{}", Card::new(&report, self.show_activities));
        self.report = Some(report);
    }
}
