//! `adjutant chat` — Interactive or single-message chat mode.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use adjutant_agent::{ChatService, TurnRunner};
use adjutant_config::AppConfig;
use adjutant_core::session::{InMemorySessionStore, SessionStore};
use adjutant_providers::OpenAiProvider;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for the API key early — give a clear error
    if config.llm.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set the environment variable:");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!();
        eprintln!("  The Notion and GitHub tools also want NOTION_TOKEN, DATABASE_ID");
        eprintln!("  and GITHUB_TOKEN; without them the assistant will tell you");
        eprintln!("  which one is missing when you ask for tasks or repos.");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = Arc::new(OpenAiProvider::from_config(&config.llm)?);
    let tools = Arc::new(adjutant_tools::default_registry(&config));
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let runner = TurnRunner::new(provider, tools.clone(), &config);
    let service = ChatService::new(store, runner);

    // One terminal run is one session
    let session_id = uuid::Uuid::new_v4().to_string();

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = service.handle_message(&session_id, &msg).await?;
        eprint!("\r              \r");
        println!("{reply}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Adjutant — Interactive Mode");
    println!();
    println!("  Model:    {}", config.llm.model);
    println!("  Tools:    {} registered (Notion tasks, GitHub repos)", tools.len());
    println!("  Session:  {session_id}");
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(input) = lines.next_line().await? else {
            break; // EOF
        };
        let text = input.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
            break;
        }

        eprint!("  ...");
        match service.handle_message(&session_id, text).await {
            Ok(reply) => {
                eprint!("\r     \r");
                println!();
                for line in reply.lines() {
                    println!("  Adjutant > {line}");
                }
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}
