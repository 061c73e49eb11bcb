mod net;
mod widgets;
#[cfg(feature = "tui")]
mod keymap;
#[cfg(feature = "tui")]
mod theme;
#[cfg(feature = "tui")]
mod screens;
#[cfg(feature = "tui")]
mod app;

#[cfg(feature = "tui")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}

#[cfg(not(feature = "tui"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Headless: print the case list so the binary is still useful over ssh pipes.
    for row in net::list_cases().await? {
        println!("{}\t{}", row.id, row.reason);
    }
    Ok(())
}
