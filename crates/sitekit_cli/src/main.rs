//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive one contact-form submission through `sitekit_core` headlessly.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `sitekit_cli [--offline] [name=value ...]`

use sitekit_core::{
    core_version, AppContext, Connectivity, FieldId, Form, FormField, OfflineAwareTransport,
    Page, PipelineConfig, RecordingNavigator, SubmitDisposition,
};
use std::process::ExitCode;

fn contact_form() -> Form {
    Form::new()
        .with_marker("needs-validation")
        .with_field(FormField::text(FieldId::FirstName.as_str()).required())
        .with_field(FormField::text(FieldId::LastName.as_str()).required())
        .with_field(FormField::email(FieldId::Email.as_str()).required())
        .with_field(FormField::tel(FieldId::Phone.as_str()))
        .with_field(FormField::text(FieldId::Company.as_str()))
        .with_field(FormField::text_area(FieldId::Message.as_str()).required())
        .with_field(FormField::checkbox("privacy").required())
        .with_submit("Nachricht senden")
}

fn main() -> ExitCode {
    println!("sitekit_core version={}", core_version());

    let mut offline = false;
    let mut values = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--offline" {
            offline = true;
        } else if let Some((name, value)) = arg.split_once('=') {
            values.push((name.to_string(), value.to_string()));
        } else {
            eprintln!("ignoring argument without `=`: {arg}");
        }
    }

    let connectivity = if offline {
        Connectivity::offline()
    } else {
        Connectivity::online()
    };
    let navigator = RecordingNavigator::new();
    let mut context = match AppContext::new(
        PipelineConfig::default(),
        Box::new(OfflineAwareTransport::new(connectivity)),
        Box::new(navigator.clone()),
    ) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("failed to create context: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = context.setup(Page::new(vec![contact_form()])) {
        eprintln!("failed to attach form: {err}");
        return ExitCode::FAILURE;
    }

    for (name, value) in &values {
        let result = if name == "privacy" {
            context.set_checked(0, name, value == "on" || value == "true")
        } else {
            context.input(0, name, value)
        };
        if let Err(err) = result {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }

    let disposition = match context.submit(0) {
        Ok(disposition) => disposition,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    match &disposition {
        SubmitDisposition::Rejected { invalid_fields } => {
            if let Some(form) = context.form(0) {
                for name in invalid_fields {
                    let message = form
                        .form()
                        .field(name)
                        .and_then(|field| field.error_message())
                        .unwrap_or_default();
                    println!("invalid {name}: {message}");
                }
            }
        }
        other => println!("disposition={other:?}"),
    }

    let latency = context.config().submit_latency();
    context.advance_by(latency);
    for notification in context.notifications().entries() {
        println!(
            "notification severity={} message={}",
            notification.severity.as_str(),
            notification.message
        );
    }
    match navigator.last_visit() {
        Some(target) => {
            println!("navigated to {target}");
            ExitCode::SUCCESS
        }
        None => ExitCode::FAILURE,
    }
}
