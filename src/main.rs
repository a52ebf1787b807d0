use draughts_engine::web::run_server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Draughts - forced-capture checkers");
    println!("==================================");
    println!();

    run_server().await?;

    Ok(())
}
