use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use linguacoach::config::{logging, settings::Settings};
use linguacoach::modules::chat::controller::ChatEvent;
use linguacoach::modules::chat::model::{OfflinePolicy, Role};
use linguacoach::modules::chat::session::ChatSession;
use linguacoach::modules::language::controller::{
    partition_by_stt, partition_by_tts, source_options, target_options, LanguageOption,
};
use linguacoach::modules::speech::capturer::{NoCapturer, SpeechCapturer};
use linguacoach::modules::translation::controller::TranslatorEvent;
use linguacoach::modules::translation::model::{AudioPolicy, LengthWarningPolicy};
use linguacoach::modules::translation::schema::Gender;
use linguacoach::modules::translation::session::TranslatorSession;
use linguacoach::modules::translation::view::{AudioView, OutputView};
use linguacoach::platform::Prompter;
use linguacoach::services::audio::AudioFetcher;
use linguacoach::services::realtime::{Reconnect, WebSocketChannel};
use linguacoach::services::stt::{ClipCapturer, SttClient};
use linguacoach::services::translator::TranslatorClient;
use linguacoach::AppState;

#[derive(Parser)]
#[command(name = "linguacoach", version, about = "Translate, pronounce and practice languages from the terminal")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List supported languages grouped by speech support
    Languages {
        #[arg(long)]
        json: bool,
    },
    /// Translate a sentence
    Translate(TranslateArgs),
    /// Join a peer-teaching chat room
    Chat(ChatArgs),
}

#[derive(clap::Args)]
struct TranslateArgs {
    /// Text to translate (omit when using --speak)
    text: Option<String>,

    #[arg(long = "from", default_value = "en")]
    source: String,

    #[arg(long = "to", default_value = "hi")]
    target: String,

    #[arg(long, value_enum, default_value_t = GenderArg::Female)]
    speaker_gender: GenderArg,

    #[arg(long, value_enum, default_value_t = GenderArg::Female)]
    voice_gender: GenderArg,

    /// Recorded clip to transcribe in the source language instead of typing
    #[arg(long, conflicts_with = "text")]
    speak: Option<PathBuf>,

    /// Where to write the synthesized audio
    #[arg(long)]
    save_audio: Option<PathBuf>,

    #[arg(long, value_enum)]
    audio_policy: Option<AudioPolicyArg>,

    /// Ask before sending long text
    #[arg(long)]
    confirm_large: bool,
}

#[derive(clap::Args)]
struct ChatArgs {
    #[arg(long)]
    username: String,

    #[arg(long, default_value = "general")]
    room: String,

    #[arg(long, value_enum, default_value_t = RoleArg::Learner)]
    role: RoleArg,

    #[arg(long, default_value = "general")]
    topic: String,

    #[arg(long = "from", default_value = "en")]
    user_lang: String,

    #[arg(long = "to", default_value = "en")]
    target_lang: String,

    /// Keep messages typed while disconnected and send them on reconnect
    #[arg(long)]
    queue_offline: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(value: GenderArg) -> Self {
        match value {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Teacher,
    Learner,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Teacher => Role::Teacher,
            RoleArg::Learner => Role::Learner,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AudioPolicyArg {
    Always,
    WhenSupported,
}

struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn alert(&self, message: &str) {
        eprintln!("! {}", message);
    }

    fn confirm(&self, message: &str) -> bool {
        eprint!("{} [y/N] ", message);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = Settings::from_env().context("Invalid configuration")?;
    let state = AppState::new(settings);

    match cli.command {
        Command::Languages { json } => languages(&state, json),
        Command::Translate(args) => translate(state, args).await,
        Command::Chat(args) => chat(state, args).await,
    }
}

fn languages(state: &AppState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(state.languages.entries())?);
        return Ok(());
    }

    let tts = partition_by_tts(&state.languages);
    let stt = partition_by_stt(&state.languages);

    print_options(
        &format!("Source (speech input for {})", stt.supported.len()),
        &source_options(&state.languages),
    );
    print_options(
        &format!("Target (voice output for {})", tts.supported.len()),
        &target_options(&state.languages),
    );
    Ok(())
}

fn print_options(title: &str, options: &[LanguageOption]) {
    println!("{}:", title);
    for option in options {
        println!("  {:<4} {}", option.code, option.label);
    }
}

async fn translate(mut state: AppState, args: TranslateArgs) -> Result<()> {
    for code in [&args.source, &args.target] {
        if state.languages.lookup(code).is_none() {
            bail!("Unsupported language code: {}", code);
        }
    }

    if let Some(policy) = args.audio_policy {
        state.settings.submit_policy.audio = match policy {
            AudioPolicyArg::Always => AudioPolicy::Always,
            AudioPolicyArg::WhenSupported => AudioPolicy::WhenSupported,
        };
    }
    if args.confirm_large {
        state.settings.submit_policy.length_warning = LengthWarningPolicy::Confirm;
    }

    let client = TranslatorClient::from_settings(&state.settings)?;

    let capturer: Box<dyn SpeechCapturer> = match &args.speak {
        Some(clip) => {
            let stt = SttClient::from_settings(&state.settings)?;
            Box::new(ClipCapturer::new(stt, clip)?)
        }
        None => Box::new(NoCapturer),
    };

    let mut session = TranslatorSession::new(state.reducer_context(), client, capturer, TerminalPrompter);

    session.dispatch(TranslatorEvent::SourceSelected(args.source.clone())).await;
    session.dispatch(TranslatorEvent::TargetSelected(args.target.clone())).await;
    session.dispatch(TranslatorEvent::SpeakerGenderSelected(args.speaker_gender.into())).await;
    session.dispatch(TranslatorEvent::VoiceGenderSelected(args.voice_gender.into())).await;

    if args.speak.is_some() {
        session.dispatch(TranslatorEvent::MicrophoneRequested).await;
        if !session.state().input_text.is_empty() {
            println!("Heard: {}", session.state().input_text);
        }
    }
    if let Some(text) = args.text {
        session.dispatch(TranslatorEvent::InputChanged(text)).await;
    }

    let view = session.view();
    if let Some(warning) = view.counter.warning {
        eprintln!("{}/{} characters - {}", view.counter.count, view.counter.max, warning);
    }

    session.dispatch(TranslatorEvent::SubmitRequested).await;

    let Some(output) = session.view().output else {
        return Ok(());
    };
    println!("{}", output);

    if let OutputView::Translation {
        audio: AudioView::Player { url },
        ..
    } = &output
    {
        let fetcher = AudioFetcher::default();
        let path = fetcher.save(url, args.save_audio.as_deref()).await?;
        println!("Audio saved to {}", path.display());
    }

    Ok(())
}

async fn chat(state: AppState, args: ChatArgs) -> Result<()> {
    let policy = if args.queue_offline {
        OfflinePolicy::Queue
    } else {
        state.settings.offline_policy
    };
    let reconnect = (state.settings.chat_reconnect_attempts > 0).then_some(Reconnect {
        attempts: state.settings.chat_reconnect_attempts,
        delay: state.settings.chat_reconnect_delay,
    });

    let channel =
        WebSocketChannel::connect(&state.settings.chat_url, state.settings.chat_framing, reconnect).await?;
    let mut session = ChatSession::new(channel, TerminalPrompter, policy);
    info!(session_id = %session.id(), room = %args.room, "Chat session started");

    session.dispatch(ChatEvent::UsernameChanged(args.username)).await;
    session.dispatch(ChatEvent::RoomChanged(args.room)).await;
    session.dispatch(ChatEvent::RoleSelected(args.role.into())).await;
    session.dispatch(ChatEvent::TopicChanged(args.topic)).await;
    session
        .dispatch(ChatEvent::LanguagesSelected {
            user_lang: args.user_lang,
            target_lang: args.target_lang,
        })
        .await;

    session.pump().await;
    session.dispatch(ChatEvent::JoinRequested).await;
    if !session.state().session.joined {
        session.shutdown().await;
        bail!("Could not join the room");
    }
    eprintln!("Joined. Type a message, /explain <question>, or /quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            appended = session.pump() => match appended {
                Some(messages) => {
                    for message in messages {
                        println!("{}", message);
                    }
                }
                None => {
                    eprintln!("Connection closed");
                    break;
                }
            },
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line == "/quit" {
                        break;
                    } else if let Some(context) = line.strip_prefix("/explain ") {
                        session
                            .dispatch(ChatEvent::ExplanationRequested {
                                context: context.to_string(),
                            })
                            .await;
                    } else {
                        session.send(line).await;
                    }
                }
                Ok(None) | Err(_) => break,
            },
        }
    }

    session.shutdown().await;
    Ok(())
}
