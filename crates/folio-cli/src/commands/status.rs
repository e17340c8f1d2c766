//! Status command handler

use anyhow::Result;

use folio_core::ContentStore;

use crate::output::Output;

/// Show store status: data location and collection counts
pub fn show(store: &ContentStore, output: &Output) -> Result<()> {
    let config = store.config();
    let doc = store.document();

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "data_dir": config.data_dir,
                "pulse_sync": config.pulse_sync,
                "certificates": doc.certificates.len(),
                "projects": doc.projects.len(),
                "blog_posts": doc.blog_posts.len(),
                "social_links": doc.social_links.len(),
                "skill_categories": doc.skills.len(),
                "visits": doc.visitor_logs.len(),
                "change_records": store.changelog().len(),
            })
        );
        return Ok(());
    }

    if output.is_quiet() {
        println!("{}", config.data_dir.display());
        return Ok(());
    }

    println!("Data directory: {}", config.data_dir.display());
    println!("Pulse sync:     {}", if config.pulse_sync { "on" } else { "off" });
    println!();
    println!("Certificates:   {}", doc.certificates.len());
    println!("Projects:       {}", doc.projects.len());
    println!("Blog posts:     {}", doc.blog_posts.len());
    println!("Social links:   {}", doc.social_links.len());
    println!("Skill groups:   {}", doc.skills.len());
    println!("Visits logged:  {}", doc.visitor_logs.len());
    println!("Change records: {}", store.changelog().len());

    Ok(())
}
