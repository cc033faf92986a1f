use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;

mod api;
mod cli;
mod models;
mod services;
mod state;

use api::{health, kill_process, list_processes, resume_process, suspend_process};
use cli::CommandArgs;
use state::new_state;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CommandArgs::parse();
    let bind_address = format!("{}:{}", args.address, args.port);

    let state = new_state(args.api_key.clone());

    print_banner(&args);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .route("/processes", web::get().to(list_processes))
            .route("/processes/{pid}/kill", web::post().to(kill_process))
            .route("/processes/{pid}/suspend", web::post().to(suspend_process))
            .route("/processes/{pid}/resume", web::post().to(resume_process))
            .route("/health", web::get().to(health))
    })
        .bind(&bind_address)?
        .run()
        .await
}

fn print_banner(args: &CommandArgs) {
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║      Process Manager v0.1.0                               ║");
    println!("║      Host Process Control API                             ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!("🚀 Server starting on http://{}:{}", args.address, args.port);
    println!();
    println!("📋 Available endpoints:");
    println!("  GET    /processes               - List running processes");
    println!("  POST   /processes/{{pid}}/kill    - Force-kill a process");
    println!("  POST   /processes/{{pid}}/suspend - Suspend a process");
    println!("  POST   /processes/{{pid}}/resume  - Resume a process");
    println!("  GET    /health                  - Health check");
    println!();
    println!("🔑 /processes routes require the X-API-Key header");
    println!("═══════════════════════════════════════════════════════════");
}
