//! Minimal demo front end: a REPL that drives one [`wisp_loop::Soul`] over
//! stdin/stdout (§9 "CLI", "Exit codes"). Not a production terminal UI;
//! it exists to exercise the engine end to end the way `retrieval-cli`
//! exercises the retrieval system.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::AsyncBufReadExt;
use wisp_approval::ApprovalGate;
use wisp_context::ContextStore;
use wisp_loop::Soul;
use wisp_loop::SubmitOutcome;
use wisp_model::EchoApiClient;
use wisp_model::StaticModel;
use wisp_slash::SlashRegistry;
use wisp_tools::ToolRegistry;
use wisp_tools::builtin::ReadFileTool;
use wisp_tools::builtin::WriteTodosTool;
use wisp_tools_api::Injector;
use wisp_wire::WireEvent;
use wisp_wire::new_wire;

#[derive(Parser)]
#[command(name = "wisp")]
#[command(about = "Interactive agent loop demo front end")]
struct Cli {
    /// Working directory the session operates over.
    #[arg(default_value = ".")]
    workdir: PathBuf,

    /// Resume the most recently modified session instead of starting fresh.
    #[arg(long)]
    r#continue: bool,

    /// Model id to report on the session (the demo engine only ever
    /// echoes, regardless of what is selected here).
    #[arg(long, default_value = "demo-echo")]
    model: String,

    /// Skip every approval prompt.
    #[arg(long)]
    yolo: bool,
}

/// Exit code classes from the usage-error / runtime-error split.
const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_ERROR: i32 = 1;
const EXIT_USAGE_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wisp_cli=info".parse().expect("static directive is valid")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = run(cli).await;
    std::process::exit(code);
}

async fn run(cli: Cli) -> i32 {
    let workdir = cli.workdir.canonicalize().unwrap_or(cli.workdir.clone());

    let config = match wisp_config::load_layered(&workdir) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("wisp: failed to load configuration: {err}");
            return EXIT_RUNTIME_ERROR;
        }
    };

    let sessions_dir = config.sessions_dir.clone().unwrap_or_else(wisp_session::default_sessions_dir);
    if let Err(err) = tokio::fs::create_dir_all(&sessions_dir).await {
        eprintln!("wisp: failed to create sessions directory {}: {err}", sessions_dir.display());
        return EXIT_RUNTIME_ERROR;
    }

    let session_id = match wisp_session::resolve_session_id(&sessions_dir, cli.r#continue).await {
        Ok(id) => id,
        Err(err @ wisp_session::SessionError::NoPriorSession(_)) => {
            eprintln!("wisp: {err}");
            return EXIT_USAGE_ERROR;
        }
        Err(err) => {
            eprintln!("wisp: {err}");
            return EXIT_RUNTIME_ERROR;
        }
    };
    let session_path = wisp_session::session_file_path(&sessions_dir, &session_id);

    let context = match ContextStore::open(&session_path).await {
        Ok(store) => store,
        Err(err) => {
            eprintln!("wisp: failed to open session file {}: {err}", session_path.display());
            return EXIT_RUNTIME_ERROR;
        }
    };

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(ReadFileTool));
    tools.register(Arc::new(WriteTodosTool));

    let model_id = config.default_model.clone().unwrap_or(cli.model);
    let model = Arc::new(StaticModel {
        id: model_id,
        max_context_tokens: 200_000,
        supports_thinking: config.default_thinking,
    });

    let approval = Arc::new(ApprovalGate::new());
    approval.set_yolo(cli.yolo);

    let wire_pair = new_wire();
    let mut slash = SlashRegistry::new();
    wisp_slash::register_builtins(&mut slash);

    println!("wisp session {session_id} ({})", session_path.display());
    println!("model: {}", model.id());
    println!("type a message, or /compact, /yolo, /model <id>, /thinking, /context; Ctrl-D to quit");

    let mut soul = Soul::new(
        workdir,
        context,
        tools,
        Arc::new(EchoApiClient::new("(demo) I hear you.")),
        model,
        approval,
        Arc::new(wire_pair.engine),
        slash,
        config.loop_control,
        Injector::new(),
    );

    let mut ui = wire_pair.ui;
    let printer = tokio::spawn(async move {
        while let Some(event) = ui.recv_event().await {
            print_event(event);
        }
    });

    let stdin = tokio::io::stdin();
    let mut lines = tokio::io::BufReader::new(stdin);
    let mut line = String::new();

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        line.clear();
        let bytes = match lines.read_line(&mut line).await {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("wisp: stdin read failed: {err}");
                return EXIT_RUNTIME_ERROR;
            }
        };
        if bytes == 0 {
            break;
        }
        let input = line.trim().to_string();
        if input.is_empty() {
            continue;
        }
        if input == "/quit" || input == "/exit" {
            break;
        }

        match soul.submit(input).await {
            SubmitOutcome::Ran(outcome) => {
                if matches!(outcome, wisp_wire::TurnOutcome::FatalError) {
                    eprintln!("wisp: turn ended in a fatal error");
                }
            }
            SubmitOutcome::Queued(id) => {
                println!("(queued behind the running turn, id={id})");
            }
        }
    }

    drop(soul);
    let _ = printer.await;
    EXIT_SUCCESS
}

fn print_event(event: WireEvent) {
    match event {
        WireEvent::Text { delta } => print!("{delta}"),
        WireEvent::Thought { delta } => print!("\x1b[2m{delta}\x1b[0m"),
        WireEvent::ToolCallComplete { call_id } => println!("\n[tool call {call_id} complete]"),
        WireEvent::ToolResult { call_id, output } => {
            let marker = if output.is_error { "error" } else { "ok" };
            println!("\n[tool {call_id} {marker}]");
        }
        WireEvent::TurnEnd { .. } => println!(),
        WireEvent::StatusUpdate { context_tokens, max_context_tokens } => {
            tracing::debug!(context_tokens, max_context_tokens, "status update");
        }
        _ => {}
    }
}
