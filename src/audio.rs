use std::fmt::{Display, Formatter};
use std::fs;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use itertools::Itertools;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Up,
    Down,
    Hit,
    Wall,
    Score,
}

impl SoundCue {
    pub const ALL: [SoundCue; 5] = [SoundCue::Up, SoundCue::Down, SoundCue::Hit, SoundCue::Wall, SoundCue::Score];

    /// file name prefix of the cue's clips
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Up => "up",
            SoundCue::Down => "down",
            SoundCue::Hit => "hit",
            SoundCue::Wall => "wall",
            SoundCue::Score => "score",
        }
    }
}

impl Display for SoundCue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub trait SoundPlayer {
    fn play(&self, cue: SoundCue);
}

/// Sound clips per cue. Every clip is decoded once at load time, so a broken file fails
/// startup; the encoded bytes are kept and decoded again on each play.
pub struct SoundBank {
    clips: FxHashMap<SoundCue, Vec<Arc<[u8]>>>,
}

impl SoundBank {
    /// Loads every `<cue><n>.<ext>` file of `sounds_dir`; each cue needs at least one.
    pub fn load(sounds_dir: &Path) -> anyhow::Result<Self> {
        let mut clips = FxHashMap::default();
        for cue in SoundCue::ALL {
            let files = variant_files(sounds_dir, cue)?;
            if files.is_empty() {
                bail!("no sound file for cue '{cue}' in {}", sounds_dir.display());
            }
            let variants = files
                .iter()
                .map(|path| load_clip(path))
                .collect::<anyhow::Result<Vec<Arc<[u8]>>>>()?;
            log::debug!("sound cue '{cue}': {} variant(s)", variants.len());
            clips.insert(cue, variants);
        }
        Ok(Self { clips })
    }

    pub fn variant_count(&self, cue: SoundCue) -> usize {
        self.clips.get(&cue).map_or(0, Vec::len)
    }

    pub fn first_variant(&self, cue: SoundCue) -> Option<&Arc<[u8]>> {
        self.clips.get(&cue).and_then(|variants| variants.first())
    }
}

fn load_clip(path: &Path) -> anyhow::Result<Arc<[u8]>> {
    let clip = fs::read(path)
        .map(Arc::<[u8]>::from)
        .with_context(|| format!("failed to read sound file {}", path.display()))?;
    Decoder::new(Cursor::new(Arc::clone(&clip)))
        .with_context(|| format!("failed to decode sound file {}", path.display()))?;
    Ok(clip)
}

/// numeric suffix of `path` when it names a clip of `cue`
fn variant_index(path: &Path, cue: SoundCue) -> Option<u32> {
    path.file_stem()?
        .to_str()?
        .strip_prefix(cue.name())?
        .parse()
        .ok()
}

fn variant_files(sounds_dir: &Path, cue: SoundCue) -> anyhow::Result<Vec<PathBuf>> {
    let dir = sounds_dir
        .to_str()
        .with_context(|| format!("sound directory {} is not valid UTF-8", sounds_dir.display()))?;
    let pattern = format!("{}/{}[0-9]*.*", glob::Pattern::escape(dir), cue.name());

    let paths = glob::glob(&pattern)
        .with_context(|| format!("invalid sound file pattern '{pattern}'"))?
        .collect::<Result<Vec<PathBuf>, _>>()
        .context("failed to list sound files")?;

    Ok(paths
        .into_iter()
        .filter_map(|path| variant_index(&path, cue).map(|idx| (idx, path)))
        .sorted_by_key(|(idx, _)| *idx)
        .map(|(_, path)| path)
        .collect())
}

/// The audio device: plays cues from a [SoundBank] and loops the background music.
pub struct AudioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    _music: Sink,
    bank: SoundBank,
}

impl AudioOutput {
    pub fn start(bank: SoundBank, music_path: &Path, music_volume: f32) -> anyhow::Result<Self> {
        let (stream, handle) = OutputStream::try_default().context("failed to open the audio output device")?;

        let music_file = File::open(music_path).with_context(|| format!("failed to open music {}", music_path.display()))?;
        let music = Decoder::new(BufReader::new(music_file))
            .with_context(|| format!("failed to decode music {}", music_path.display()))?;
        let music_sink = Sink::try_new(&handle).context("failed to create the music sink")?;
        music_sink.set_volume(music_volume);
        music_sink.append(music.repeat_infinite());
        log::info!("playing {} at volume {music_volume}", music_path.display());

        Ok(Self {
            _stream: stream,
            handle,
            _music: music_sink,
            bank,
        })
    }
}

impl SoundPlayer for AudioOutput {
    fn play(&self, cue: SoundCue) {
        let Some(clip) = self.bank.first_variant(cue) else {
            log::warn!("no clip for sound cue '{cue}'");
            return;
        };
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::warn!("cannot play '{cue}': {e}");
                return;
            }
        };
        match Decoder::new(Cursor::new(Arc::clone(clip))) {
            Ok(source) => {
                sink.append(source);
                sink.detach();
            }
            Err(e) => log::warn!("cannot decode '{cue}': {e}"),
        }
    }
}


#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use rstest::rstest;

    use super::*;

    /// a short mono 16 bit PCM wav; `sample_count` tells clips apart
    fn wav_clip(sample_count: u16) -> Vec<u8> {
        let data_len = u32::from(sample_count) * 2;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16_u32.to_le_bytes());
        bytes.extend_from_slice(&1_u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1_u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&8000_u32.to_le_bytes());
        bytes.extend_from_slice(&16000_u32.to_le_bytes());
        bytes.extend_from_slice(&2_u16.to_le_bytes());
        bytes.extend_from_slice(&16_u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for i in 0..sample_count {
            bytes.extend_from_slice(&(i as i16 * 64).to_le_bytes());
        }
        bytes
    }

    fn write_clip(dir: &Path, file_name: &str, sample_count: u16) {
        fs::write(dir.join(file_name), wav_clip(sample_count)).unwrap();
    }

    fn write_all_cues(dir: &Path) {
        for cue in SoundCue::ALL {
            write_clip(dir, &format!("{}0.ogg", cue.name()), 4);
        }
    }

    #[rstest]
    #[case("up0.ogg", SoundCue::Up, Some(0))]
    #[case("up12.wav", SoundCue::Up, Some(12))]
    #[case("up.ogg", SoundCue::Up, None)]
    #[case("upbeat1.ogg", SoundCue::Up, None)]
    #[case("down3.ogg", SoundCue::Up, None)]
    fn variant_index_of_file(#[case] file_name: &str, #[case] cue: SoundCue, #[case] expected: Option<u32>) {
        assert_eq!(variant_index(Path::new(file_name), cue), expected);
    }

    #[test]
    fn loads_all_variants_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        write_all_cues(dir.path());
        write_clip(dir.path(), "hit10.ogg", 10);
        write_clip(dir.path(), "hit2.wav", 2);
        fs::write(dir.path().join("hit_unused.ogg"), b"not a clip").unwrap();

        let bank = SoundBank::load(dir.path()).unwrap();

        assert_eq!(bank.variant_count(SoundCue::Hit), 3);
        assert_eq!(bank.variant_count(SoundCue::Up), 1);
        assert_eq!(bank.first_variant(SoundCue::Hit).map(|clip| clip.to_vec()), Some(wav_clip(4)));
    }

    #[test]
    fn first_variant_is_the_lowest_index() {
        let dir = tempfile::tempdir().unwrap();
        write_all_cues(dir.path());
        fs::remove_file(dir.path().join("score0.ogg")).unwrap();
        write_clip(dir.path(), "score7.ogg", 7);
        write_clip(dir.path(), "score3.ogg", 3);

        let bank = SoundBank::load(dir.path()).unwrap();

        assert_eq!(bank.first_variant(SoundCue::Score).map(|clip| clip.to_vec()), Some(wav_clip(3)));
    }

    #[test]
    fn missing_cue_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        write_all_cues(dir.path());
        fs::remove_file(dir.path().join("wall0.ogg")).unwrap();

        let error = SoundBank::load(dir.path()).err().unwrap();

        assert!(error.to_string().contains("'wall'"), "{error}");
    }

    #[test]
    fn undecodable_clip_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        write_all_cues(dir.path());
        fs::write(dir.path().join("hit0.ogg"), b"just some text").unwrap();

        let error = SoundBank::load(dir.path()).err().unwrap();

        assert!(error.to_string().contains("hit0.ogg"), "{error}");
    }

    #[test]
    fn missing_directory_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SoundBank::load(&dir.path().join("nowhere")).is_err());
    }
}
