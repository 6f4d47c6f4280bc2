//! Basic example demonstrating the FOSSology API client.
//!
//! Run with:
//! ```
//! FOSSOLOGY_URL=http://localhost/repo FOSSOLOGY_USERNAME=fossy \
//!   FOSSOLOGY_PASSWORD=fossy FOSSOLOGY_TOKEN_EXPIRE=2030-01-01 \
//!   cargo run --example basic
//! ```

use fossology::{Fossology, SearchQuery};

#[tokio::main]
async fn main() -> fossology::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Log in using environment variables
    println!("Connecting to FOSSology...");
    let client = Fossology::from_env().await?;
    println!("Connected to: {}", client.connection().base_url());

    println!("\n--- Folders ---");
    let folders = client.list_folders().await?;
    for folder in &folders {
        println!(
            "  - {} ({}) parent: {}",
            folder.name().unwrap_or("unnamed"),
            folder.id(),
            folder.parent().unwrap_or("-")
        );
    }

    println!("\n--- Uploads ---");
    let uploads = client.list_uploads().await?;
    println!("Found {} uploads", uploads.len());
    for upload in uploads.iter().take(10) {
        println!(
            "  - {} ({}) in {} [{} bytes]",
            upload.name().unwrap_or("unnamed"),
            upload.id(),
            upload.folder_name().unwrap_or("?"),
            upload.file_size().unwrap_or(0)
        );
    }

    println!("\n--- Recent Jobs ---");
    for job in client.list_jobs(Some(5)).await? {
        println!(
            "  - {} upload {}: {}",
            job.id(),
            job.upload_id.as_deref().unwrap_or("?"),
            job.status.as_deref().unwrap_or("unknown")
        );
    }

    println!("\n--- Search: %.c ---");
    let hits = client.search(&SearchQuery::filename("%.c")).await?;
    for hit in hits.iter().take(10) {
        println!("  - {} in upload {}", hit.filename, hit.upload.id());
    }

    client.close();
    println!("\nDone!");
    Ok(())
}
