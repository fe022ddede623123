//! Interactive terminal front-end for the campaign wizard.
//!
//! Drives a [`WizardSession`] over stdin with one command per line,
//! re-rendering the current step after each command. Collaborator
//! failures are printed as notices; they never abort the session.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relance_client::{
    ApiClient, KeyValueStore, MemoryStore, ReferenceData, KEY_AUTH_TOKEN,
};
use relance_core::draft::{EmailProvider, TargetType, UpdateDraft};
use relance_wizard::{StepBody, StepView, WizardSession};

mod config;

use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relance=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Platform storage port; the terminal app only keeps the token in
    // memory, a desktop shell would plug its own store here.
    let storage = MemoryStore::default();
    if let Some(token) = &config.api_token {
        storage.set(KEY_AUTH_TOKEN, token);
    }

    let api = Arc::new(ApiClient::new(
        config.api_base_url.clone(),
        storage.get(KEY_AUTH_TOKEN),
    ));
    tracing::info!(base_url = %config.api_base_url, "Backend client ready");

    let autosave_interval = Duration::from_secs(config.autosave_interval_secs);
    let session = match config.draft_id {
        Some(draft_id) => {
            tracing::info!(draft_id, "Resuming saved draft");
            WizardSession::resume(
                api.clone(),
                api.clone(),
                api.clone(),
                autosave_interval,
                draft_id,
            )
            .await?
        }
        None => WizardSession::start(api.clone(), api.clone(), api.clone(), autosave_interval),
    };

    println!("relance — campaign wizard (type 'help' for commands)");
    render(&session.render().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "quit" | "exit" => break,
            "help" => print_help(),
            "show" => render(&session.render().await),
            "next" => match session.advance().await {
                Ok(_) => render(&session.render().await),
                Err(e) => println!("! {e}"),
            },
            "back" => {
                session.retreat().await;
                render(&session.render().await);
            }
            "save" => match session.save_now().await {
                Ok(at) => println!("Enregistré à {}", at.format("%H:%M:%S")),
                Err(e) => println!("! Échec de l'enregistrement : {e}"),
            },
            "count" => {
                session.refresh_count().await;
                render(&session.render().await);
            }
            "test" => match session.send_test(rest).await {
                Ok(()) => println!("E-mail de test envoyé à {rest}"),
                Err(e) => println!("! Échec de l'envoi de test : {e}"),
            },
            "submit" => match session.submit().await {
                Ok(receipt) => {
                    println!("Campagne {} acceptée", receipt.campaign_id);
                    break;
                }
                Err(e) => println!("! Échec de la soumission : {e}"),
            },
            "refs" => print_reference_data(api.as_ref()).await,
            _ => match parse_update(command, rest) {
                Some(update) => {
                    session.update(update).await;
                    render(&session.render().await);
                }
                None => println!("! Commande inconnue : {command} (essayez 'help')"),
            },
        }
    }

    session.shutdown().await;
    tracing::info!("Wizard session closed");
    Ok(())
}

/// Map a field command to a partial draft update.
fn parse_update(command: &str, rest: &str) -> Option<UpdateDraft> {
    let mut update = UpdateDraft::default();
    match command {
        "name" => update.name = Some(rest.to_string()),
        "desc" => update.description = Some(rest.to_string()),
        "product" => update.product_id = Some(rest.parse().ok()?),
        "template" => update.template_id = Some(rest.parse().ok()?),
        "target" => update.target = Some(TargetType::from_str_db(rest).ok()?),
        "langs" => update.languages = Some(split_list(rest)),
        "countries" => update.countries = Some(split_list(rest)),
        "categories" => update.categories = Some(split_list(rest)),
        "include" => update.include_ids = Some(split_ids(rest)?),
        "exclude" => update.exclude_ids = Some(split_ids(rest)?),
        "batch" => update.batch_size = Some(rest.parse().ok()?),
        "delay" => update.batch_delay_secs = Some(rest.parse().ok()?),
        "sender" => update.sender_name = Some(rest.to_string()),
        "email" => update.sender_email = Some(rest.to_string()),
        "provider" => update.provider = Some(EmailProvider::from_str_db(rest).ok()?),
        _ => return None,
    }
    Some(update)
}

fn split_list(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn split_ids(rest: &str) -> Option<Vec<i64>> {
    rest.split(',')
        .map(|s| s.trim().parse().ok())
        .collect()
}

/// Print the current step to the terminal.
fn render(view: &StepView) {
    println!();
    println!(
        "── {} — étape {}/{} ──",
        view.label, view.step_number, view.total_steps
    );

    match &view.body {
        StepBody::BasicInfo {
            name,
            description,
            product_id,
            template_id,
        } => {
            println!("  Nom        : {}", display(name));
            println!("  Description: {}", display_opt(description.as_deref()));
            println!("  Produit    : {}", display_id(*product_id));
            println!("  Modèle     : {}", display_id(*template_id));
        }
        StepBody::Recipients {
            filters,
            count_label,
            overlapping_ids,
            ..
        } => {
            println!("  Cible      : {}", filters.target.as_str());
            println!("  Langues    : {}", filters.languages.join(", "));
            println!("  Pays       : {}", filters.countries.join(", "));
            println!("  Catégories : {}", filters.categories.join(", "));
            println!("  Inclus     : {:?}", filters.include_ids);
            println!("  Exclus     : {:?}", filters.exclude_ids);
            println!("  → {count_label}");
            if !overlapping_ids.is_empty() {
                println!("  ⚠ Ids à la fois inclus et exclus : {overlapping_ids:?}");
            }
        }
        StepBody::Configuration {
            batch_size,
            batch_delay_secs,
            sender_name,
            sender_email,
            provider,
        } => {
            println!("  Lot        : {batch_size} e-mails / {batch_delay_secs}s");
            println!("  Expéditeur : {}", display(sender_name));
            println!("  E-mail     : {}", display(sender_email));
            println!("  Fournisseur: {}", provider.as_str());
        }
        StepBody::Summary { draft } => {
            println!("  Campagne   : {}", draft.name);
            println!("  Expéditeur : {} <{}>", draft.sender_name, draft.sender_email);
            println!(
                "  Envoi      : lots de {} toutes les {}s via {}",
                draft.batch_size,
                draft.batch_delay_secs,
                draft.provider.as_str()
            );
        }
    }

    match &view.blocked_reason {
        Some(reason) => println!("  [suivant désactivé] {reason}"),
        None => println!("  [suivant disponible]"),
    }
}

fn display(value: &str) -> &str {
    if value.is_empty() {
        "—"
    } else {
        value
    }
}

fn display_opt(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("—")
}

fn display_id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "—".into())
}

/// Fetch and print the reference lists used by the selection inputs.
async fn print_reference_data(api: &ApiClient) {
    for (label, result) in [
        ("Produits", api.products().await),
        ("Modèles", api.templates().await),
        ("Fournisseurs", api.providers().await),
        ("Pays", api.countries().await),
    ] {
        match result {
            Ok(items) => {
                println!("{label}:");
                for item in items {
                    println!("  {} — {}", item.id, item.label);
                }
            }
            Err(e) => println!("! Impossible de charger {label} : {e}"),
        }
    }
}

fn print_help() {
    println!("Champs   : name desc product template target langs countries categories");
    println!("           include exclude batch delay sender email provider");
    println!("Actions  : next back save count test <email> submit refs show quit");
}
