//! Account resource handlers: credits, dog profiles and documents.

use std::path::Path;

use anyhow::{Result, bail};

use crate::bootstrap::CliContext;
use crate::presentation::{format_optional, print_separator, spinner, truncate_string};

/// Show the credit balance.
pub async fn credits(ctx: &CliContext) -> Result<()> {
    let balance = ctx.backend().credits.balance().await?;

    let plan = balance.subscription_tier.as_deref().unwrap_or("free");
    if balance.is_subscribed {
        println!("Plan: {plan} (subscribed, unlimited chat)");
    } else {
        println!("Plan: {plan}");
    }
    println!("Credits: {}", balance.credits);
    if !balance.can_chat() {
        println!("You are out of credits. Top up to keep chatting.");
    }
    Ok(())
}

/// List dog profiles.
pub async fn dogs(ctx: &CliContext) -> Result<()> {
    let dogs = ctx.backend().dogs.list_profiles().await?;

    if dogs.is_empty() {
        println!("No dog profiles yet.");
        return Ok(());
    }

    println!(
        "{:<6} {:<20} {:<20} {:<6} {:<8} Gender",
        "ID", "Name", "Breed", "Age", "Weight"
    );
    print_separator(72);
    for dog in dogs {
        println!(
            "{:<6} {:<20} {:<20} {:<6} {:<8} {}",
            dog.id,
            truncate_string(&dog.name, 19),
            truncate_string(dog.breed.as_deref().unwrap_or("--"), 19),
            format_optional(dog.age.as_ref(), "--"),
            format_optional(dog.weight.as_ref(), "--"),
            dog.gender.as_deref().unwrap_or("--"),
        );
    }
    println!();
    println!("Use 'mrwhite chat --dog <ID>' to talk about one of them.");
    Ok(())
}

/// List uploaded documents.
pub async fn documents(ctx: &CliContext) -> Result<()> {
    let documents = ctx.backend().documents.list_documents().await?;

    if documents.is_empty() {
        println!("No documents uploaded.");
        println!("Use 'mrwhite upload <path>' to add one.");
        return Ok(());
    }

    println!("{:<6} {:<40} Type", "ID", "File");
    print_separator(56);
    for doc in documents {
        println!(
            "{:<6} {:<40} {}",
            doc.id,
            truncate_string(&doc.filename, 39),
            doc.file_type.as_deref().unwrap_or("--"),
        );
    }
    Ok(())
}

/// Upload a document.
pub async fn upload(ctx: &CliContext, path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!(crate::CliError::Arguments(format!(
            "{} is not a file",
            path.display()
        )));
    }

    let pb = spinner(format!("Uploading {}...", path.display()));
    let result = ctx.backend().documents.upload(path).await;
    pb.finish_and_clear();

    let document = result?;
    println!("✓ Uploaded {} (ID: {})", document.filename, document.id);
    println!("Attach it with 'mrwhite chat --doc {}'.", document.id);
    Ok(())
}
