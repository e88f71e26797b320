use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use voxcheck::vad::{DEFAULT_FRAME_MS, replay_levels};
use voxcheck::wav::read_mono_wav;
use voxcheck::{
    AdaptiveVad, AdaptiveVadConfig, Language, LevelStream, SuggestedAction, repeat_request_message,
    validate_transcription,
};

fn main() -> Result<()> {
    voxcheck::init_logging();
    let params = Params::parse();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match params.command {
        Command::Levels {
            input,
            config,
            frame_ms,
        } => run_levels(&input, config.as_deref(), frame_ms, &mut out)?,
        Command::Wav {
            audio,
            config,
            frame_ms,
        } => run_wav(&audio, config.as_deref(), frame_ms, &mut out)?,
        Command::Validate {
            language,
            repeat_message,
            text,
        } => run_validate(&text.join(" "), language, repeat_message, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "voxcheck")]
#[command(about = "Adaptive VAD and transcript checks")]
struct Params {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay one volume level per line through the adaptive VAD.
    Levels {
        /// File with one level in [0, 1] per line (`-` for stdin).
        #[arg(short = 'i', long = "input", default_value = "-")]
        input: String,

        /// JSON file overriding VAD config fields.
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,

        /// Time between consecutive levels.
        #[arg(long = "frame-ms", default_value_t = DEFAULT_FRAME_MS)]
        frame_ms: u32,
    },

    /// Meter a WAV file and run the adaptive VAD over it.
    Wav {
        #[arg(short = 'a', long = "audio")]
        audio: PathBuf,

        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,

        /// Analysis window length.
        #[arg(long = "frame-ms", default_value_t = DEFAULT_FRAME_MS)]
        frame_ms: u32,
    },

    /// Score a transcript and print the verdict as JSON.
    Validate {
        #[arg(short = 'l', long = "language", value_enum, default_value_t = Language::Es)]
        language: Language,

        /// Also print the localized "please repeat" prompt when the verdict is ask_repeat.
        #[arg(long = "repeat-message", default_value_t = false)]
        repeat_message: bool,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

fn load_vad(config: Option<&Path>) -> Result<AdaptiveVad> {
    let Some(path) = config else {
        return Ok(AdaptiveVad::new());
    };

    let file = File::open(path)
        .with_context(|| format!("failed to open VAD config '{}'", path.display()))?;
    let cfg: AdaptiveVadConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse VAD config '{}'", path.display()))?;

    AdaptiveVad::with_config(cfg).context("rejected VAD config")
}

fn run_levels(
    input: &str,
    config: Option<&Path>,
    frame_ms: u32,
    out: &mut impl Write,
) -> Result<()> {
    let mut vad = load_vad(config)?;

    let reader: Box<dyn BufRead> = if input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file =
            File::open(input).with_context(|| format!("failed to open levels file '{input}'"))?;
        Box::new(BufReader::new(file))
    };

    replay_levels(&mut vad, reader, frame_ms, |decision| {
        serde_json::to_writer(&mut *out, decision)?;
        out.write_all(b"\n")?;
        Ok(())
    })
    .context("failed to replay levels")
}

fn run_wav(audio: &Path, config: Option<&Path>, frame_ms: u32, out: &mut impl Write) -> Result<()> {
    let vad = load_vad(config)?;

    let file = File::open(audio)
        .with_context(|| format!("failed to open audio file '{}'", audio.display()))?;
    let (samples, spec) = read_mono_wav(BufReader::new(file))
        .with_context(|| format!("failed to decode WAV '{}'", audio.display()))?;

    let mut stream = LevelStream::new(vad, spec.sample_rate, frame_ms)?;
    for frame in stream.push(&samples) {
        write_json_line(out, &frame)?;
    }
    if let Some(frame) = stream.flush() {
        write_json_line(out, &frame)?;
    }

    Ok(())
}

#[derive(Serialize)]
struct ValidateOutput<'a> {
    language: Language,
    #[serde(flatten)]
    result: &'a voxcheck::TranscriptionValidation,
    #[serde(skip_serializing_if = "Option::is_none")]
    repeat_message: Option<&'static str>,
}

fn run_validate(
    text: &str,
    language: Language,
    repeat_message: bool,
    out: &mut impl Write,
) -> Result<()> {
    let result = validate_transcription(text, language);
    let prompt = (repeat_message && result.suggested_action == SuggestedAction::AskRepeat)
        .then(|| repeat_request_message(language.code()));

    write_json_line(
        out,
        &ValidateOutput {
            language,
            result: &result,
            repeat_message: prompt,
        },
    )
}

fn write_json_line(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}
