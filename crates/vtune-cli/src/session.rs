//! Interactive wizard session.
//!
//! One `Session` is one page session: it rehydrates on start, reads commands
//! until the user quits or starts the OAuth redirect, and never outlives the
//! process.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};
use url::Url;
use vtune_ai::MetadataGenerator;
use vtune_auth::OAuthConfig;
use vtune_models::{mime_type_for_path, AudioTrack, Step, VideoHandle};
use vtune_wizard::{RehydrateOutcome, Wizard, WizardError, WizardResult};
use vtune_youtube::VideoUploader;

use crate::commands::{Command, HELP};
use crate::draft::MetadataDraft;

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// User quit or input ended
    Quit,
    /// Snapshot saved; the user continues at the authorize URL
    Redirect(Url),
}

pub struct Session {
    wizard: Wizard,
    draft: MetadataDraft,
    generator: Option<Arc<dyn MetadataGenerator>>,
    uploader: Arc<dyn VideoUploader>,
    oauth: OAuthConfig,
}

impl Session {
    pub fn new(wizard: Wizard, uploader: Arc<dyn VideoUploader>, oauth: OAuthConfig) -> Self {
        Self {
            wizard,
            draft: MetadataDraft::default(),
            generator: None,
            uploader,
            oauth,
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn MetadataGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn draft(&self) -> &MetadataDraft {
        &self.draft
    }

    /// Rehydrate and show what the user needs to know before the first command.
    pub fn start<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        match self.wizard.rehydrate() {
            Ok(RehydrateOutcome::Restored) => {
                writeln!(out, "Restored your progress.")?;
            }
            Ok(RehydrateOutcome::Empty | RehydrateOutcome::Discarded) => {}
            Err(e) => {
                warn!(error = %e, "Rehydration failed");
                writeln!(out, "Could not restore progress: {}", e)?;
            }
        }

        if let Some(metadata) = self.wizard.payload().metadata.clone() {
            self.draft = MetadataDraft::from(metadata);
        }

        let credentials = self.wizard.credentials();
        if let Some(error) = credentials.auth_error {
            writeln!(out, "YouTube authentication failed: {}", error)?;
            writeln!(out, "Run `auth` to try again.")?;
        } else if credentials.access_token.is_some() {
            writeln!(out, "Authenticated with YouTube.")?;
        }

        if self.wizard.needs_video_reacquisition() {
            let name = self
                .wizard
                .payload()
                .video_descriptor
                .as_ref()
                .map(|d| d.name.as_str())
                .unwrap_or("your video");
            writeln!(
                out,
                "The video was not kept across sign-in. Run `reselect <path>` with \"{}\" to publish.",
                name
            )?;
        }

        self.print_status(out)
    }

    /// Read and execute commands until quit, end of input or redirect.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> std::io::Result<SessionEnd>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            self.prompt(out)?;
            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                return Ok(SessionEnd::Quit);
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    continue;
                }
            };

            if let Some(end) = self.execute(command, out).await? {
                return Ok(end);
            }
        }
    }

    /// Execute one command. Wizard errors are reported, not returned.
    pub async fn execute<W: Write>(
        &mut self,
        command: Command,
        out: &mut W,
    ) -> std::io::Result<Option<SessionEnd>> {
        let result = match command {
            Command::Quit => return Ok(Some(SessionEnd::Quit)),
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                Ok(())
            }
            Command::Status => return self.print_status(out).map(|_| None),
            Command::Tracks => return self.print_tracks(out).map(|_| None),
            Command::Upload(path) => self.upload(&path, out).await,
            Command::Audio(id) => self.select_audio(&id, out),
            Command::Generate(summary) => self.generate(summary.as_deref(), out).await,
            Command::Title(title) => self.edit_draft(out, |draft| {
                draft.set_title(title);
                "Title updated.".to_string()
            }),
            Command::Description(description) => self.edit_draft(out, |draft| {
                draft.set_description(description);
                "Description updated.".to_string()
            }),
            Command::Tag(tag) => self.edit_draft(out, |draft| {
                if draft.add_tag(&tag) {
                    format!("Tags: {}", draft.tags().join(", "))
                } else {
                    "Tag ignored (empty or already present).".to_string()
                }
            }),
            Command::Untag(tag) => self.edit_draft(out, |draft| {
                if draft.remove_tag(&tag) {
                    format!("Tags: {}", draft.tags().join(", "))
                } else {
                    format!("No tag \"{}\".", tag)
                }
            }),
            Command::SaveMetadata => self.save_metadata(out),
            Command::Preview => self.confirm_preview(out),
            Command::Auth => match self.authorize(out) {
                Ok(Some(url)) => return Ok(Some(SessionEnd::Redirect(url))),
                Ok(None) => Ok(()),
                Err(e) => Err(e),
            },
            Command::Reselect(path) => self.reselect(&path, out).await,
            Command::Publish => self.publish(out).await,
            Command::Goto(step) => self.wizard.navigate_to(step),
            Command::Reset => self.reset(out),
        };

        match result {
            Ok(()) => Ok(None),
            Err(e) => {
                report_error(&e, out)?;
                Ok(None)
            }
        }
    }

    fn prompt<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let step = self.wizard.current_step();
        write!(out, "[{}. {}] > ", step, self.wizard.step_label(step))?;
        out.flush()
    }

    fn print_status<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for step in Step::ALL {
            let marker = if self.wizard.completed_steps().contains(step) {
                "x"
            } else if self.wizard.is_step_enabled(step) {
                " "
            } else {
                "-"
            };
            let pointer = if step == self.wizard.current_step() { ">" } else { " " };
            writeln!(
                out,
                "{} [{}] {}. {}",
                pointer,
                marker,
                step,
                self.wizard.step_label(step)
            )?;
        }

        let payload = self.wizard.payload();
        if let Some(descriptor) = &payload.video_descriptor {
            let note = if payload.video.is_none() { " (needs re-select)" } else { "" };
            writeln!(
                out,
                "  video:    {} ({} bytes){}",
                descriptor.name, descriptor.size_bytes, note
            )?;
        }
        if let Some(track) = &payload.audio_selection {
            writeln!(out, "  audio:    {} by {}", track.display_name, track.artist)?;
        }
        if let Some(metadata) = &payload.metadata {
            writeln!(out, "  title:    {}", metadata.title)?;
        }
        if let Some(result) = &payload.publish_result {
            writeln!(out, "  published: {}", result.url)?;
        }
        Ok(())
    }

    fn print_tracks<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let selected = self.wizard.payload().audio_selection.as_ref().map(|t| t.id.as_str());
        for track in AudioTrack::catalog() {
            let marker = if selected == Some(track.id.as_str()) { "*" } else { " " };
            writeln!(
                out,
                "{} {:<7} {} - {}",
                marker, track.id, track.display_name, track.artist
            )?;
        }
        Ok(())
    }

    async fn upload<W: Write>(&mut self, path: &Path, out: &mut W) -> WizardResult<()> {
        let handle = load_video(path).await?;
        let (name, size) = (handle.name().to_string(), handle.size_bytes());
        self.wizard.commit_upload(handle)?;
        writeln!(out, "Selected {} ({} bytes).", name, size).map_err(write_failed)?;
        Ok(())
    }

    fn select_audio<W: Write>(&mut self, id: &str, out: &mut W) -> WizardResult<()> {
        let track = AudioTrack::find(id)
            .ok_or_else(|| WizardError::invalid_input(format!("unknown track \"{}\" (see `tracks`)", id)))?;
        let name = track.display_name.clone();
        self.wizard.commit_audio(track)?;
        writeln!(out, "Background audio: {}.", name).map_err(write_failed)?;
        Ok(())
    }

    async fn generate<W: Write>(&mut self, summary: Option<&str>, out: &mut W) -> WizardResult<()> {
        let Some(generator) = self.generator.clone() else {
            writeln!(
                out,
                "AI generation is not configured. Set GEMINI_API_KEY or run `vidtune settings --api-key <key>`."
            )
            .map_err(write_failed)?;
            return Ok(());
        };

        writeln!(out, "Generating metadata...").map_err(write_failed)?;
        let metadata = self
            .wizard
            .generate_metadata(generator.as_ref(), summary)
            .await?;
        self.draft = MetadataDraft::from(metadata);
        self.print_draft(out).map_err(write_failed)?;
        writeln!(out, "Edit the draft or run `save-metadata` to accept it.").map_err(write_failed)?;
        Ok(())
    }

    fn edit_draft<W, F>(&mut self, out: &mut W, edit: F) -> WizardResult<()>
    where
        W: Write,
        F: FnOnce(&mut MetadataDraft) -> String,
    {
        if !self.wizard.is_step_enabled(Step::Metadata) {
            return Err(WizardError::StepLocked(Step::Metadata));
        }
        let message = edit(&mut self.draft);
        writeln!(out, "{}", message).map_err(write_failed)?;
        Ok(())
    }

    fn print_draft<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Title:       {}", self.draft.title)?;
        writeln!(out, "Description: {}", self.draft.description)?;
        writeln!(out, "Tags:        {}", self.draft.tags().join(", "))
    }

    fn save_metadata<W: Write>(&mut self, out: &mut W) -> WizardResult<()> {
        self.wizard.commit_metadata(self.draft.to_metadata())?;
        if let Some(metadata) = self.wizard.payload().metadata.clone() {
            self.draft = MetadataDraft::from(metadata);
        }
        writeln!(out, "Metadata saved.").map_err(write_failed)?;
        Ok(())
    }

    fn confirm_preview<W: Write>(&mut self, out: &mut W) -> WizardResult<()> {
        let payload = self.wizard.payload();
        if let (Some(video), Some(track), Some(metadata)) = (
            &payload.video_descriptor,
            &payload.audio_selection,
            &payload.metadata,
        ) {
            writeln!(out, "Video:       {}", video.name).map_err(write_failed)?;
            writeln!(out, "Audio:       {} by {}", track.display_name, track.artist)
                .map_err(write_failed)?;
            writeln!(out, "Title:       {}", metadata.title).map_err(write_failed)?;
            writeln!(out, "Description: {}", metadata.description).map_err(write_failed)?;
            writeln!(out, "Tags:        {}", metadata.tags.join(", ")).map_err(write_failed)?;
        }
        self.wizard.commit_preview()?;
        writeln!(out, "Preview confirmed. Run `auth` to sign in with YouTube.").map_err(write_failed)?;
        Ok(())
    }

    fn authorize<W: Write>(&mut self, out: &mut W) -> WizardResult<Option<Url>> {
        if self.wizard.tokens().has_valid_token() {
            writeln!(out, "Already authenticated. Run `publish`.").map_err(write_failed)?;
            return Ok(None);
        }
        let url = self.wizard.begin_authorization(&self.oauth)?;
        info!(session_id = %self.wizard.logger().session_id(), "Redirecting to OAuth provider");
        writeln!(out, "Progress saved. Open this URL to sign in with YouTube:").map_err(write_failed)?;
        writeln!(out, "{}", url).map_err(write_failed)?;
        writeln!(out, "Then run `vidtune callback '<redirected URL>'`.").map_err(write_failed)?;
        Ok(Some(url))
    }

    async fn reselect<W: Write>(&mut self, path: &Path, out: &mut W) -> WizardResult<()> {
        let handle = load_video(path).await?;
        let name = handle.name().to_string();
        self.wizard.reacquire_video(handle)?;
        writeln!(out, "Re-selected {}. Run `publish`.", name).map_err(write_failed)?;
        Ok(())
    }

    async fn publish<W: Write>(&mut self, out: &mut W) -> WizardResult<()> {
        writeln!(out, "Uploading to YouTube...").map_err(write_failed)?;
        let result = self.wizard.publish(self.uploader.as_ref()).await?;
        writeln!(out, "Published: {}", result.url).map_err(write_failed)?;
        Ok(())
    }

    fn reset<W: Write>(&mut self, out: &mut W) -> WizardResult<()> {
        self.draft = MetadataDraft::default();
        self.wizard.reset()?;
        writeln!(out, "Started over.").map_err(write_failed)?;
        Ok(())
    }
}

/// Read a video file into a handle; the MIME type comes from the extension.
pub async fn load_video(path: &Path) -> WizardResult<VideoHandle> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        WizardError::invalid_input(format!("cannot read {}: {}", path.display(), e))
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(VideoHandle::new(name, mime_type_for_path(path), bytes))
}

fn write_failed(e: std::io::Error) -> WizardError {
    WizardError::invalid_input(format!("failed to write output: {}", e))
}

fn report_error<W: Write>(error: &WizardError, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Error: {}", error)?;
    if error.requires_reauth() {
        writeln!(out, "Run `auth` to sign in with YouTube.")?;
    } else if error.is_retryable() {
        writeln!(out, "You can try again.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use async_trait::async_trait;
    use mockall::mock;
    use vtune_ai::{GenerationError, GenerationResult, MetadataRequest};
    use vtune_auth::{handle_callback, TokenLifecycle};
    use vtune_models::{VideoDescriptor, VideoMetadata};
    use vtune_storage::{MemoryStore, SharedStore};
    use vtune_youtube::UploadResult;

    use super::*;

    mock! {
        pub Generator {}

        #[async_trait]
        impl MetadataGenerator for Generator {
            async fn generate(&self, request: &MetadataRequest) -> GenerationResult<VideoMetadata>;
        }
    }

    mock! {
        pub Uploader {}

        #[async_trait]
        impl VideoUploader for Uploader {
            async fn upload(
                &self,
                video: &VideoHandle,
                metadata: &VideoMetadata,
                access_token: &str,
            ) -> UploadResult<String>;
        }
    }

    fn oauth() -> OAuthConfig {
        OAuthConfig::default().with_client_id(Some("client-123".into()))
    }

    fn session(store: &SharedStore, uploader: MockUploader) -> Session {
        Session::new(Wizard::new(store.clone()), Arc::new(uploader), oauth())
    }

    fn write_clip(dir: &Path) -> PathBuf {
        let path = dir.join("clip.mp4");
        std::fs::write(&path, b"clip-bytes").unwrap();
        path
    }

    async fn run_script(session: &mut Session, script: &str) -> (SessionEnd, String) {
        let mut out = Vec::new();
        let end = session.run(script.as_bytes(), &mut out).await.unwrap();
        (end, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_full_flow_across_redirect() {
        let dir = tempfile::tempdir().unwrap();
        let clip = write_clip(dir.path());
        let store: SharedStore = Arc::new(MemoryStore::new());

        let mut first = session(&store, MockUploader::new());
        let script = format!(
            "upload {}\naudio track3\ntitle T\ndescription D\ntag x\ntag y\nsave-metadata\npreview\nauth\nstatus\n",
            clip.display()
        );
        let (end, output) = run_script(&mut first, &script).await;

        let SessionEnd::Redirect(url) = end else {
            panic!("expected redirect, got {:?}\n{}", end, output);
        };
        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert!(output.contains("Metadata saved."));
        assert!(!output.contains("Error"));

        let tokens = TokenLifecycle::new(store.clone());
        handle_callback("#access_token=abc123&expires_in=3599", &tokens).unwrap();

        let mut uploader = MockUploader::new();
        uploader
            .expect_upload()
            .withf(|video, metadata, token| {
                video.name() == "clip.mp4"
                    && metadata.tags == vec!["x", "y"]
                    && token.to_string() == "abc123"
            })
            .times(1)
            .returning(|_, _, _| Ok("xyz".to_string()));

        let mut second = session(&store, uploader);
        let mut out = Vec::new();
        second.start(&mut out).unwrap();
        let banner = String::from_utf8(out).unwrap();
        assert!(banner.contains("Restored your progress."));
        assert!(banner.contains("Authenticated with YouTube."));
        assert!(banner.contains("reselect"));
        assert_eq!(second.draft().title, "T");

        let (end, output) = run_script(
            &mut second,
            &format!("reselect {}\npublish\nquit\n", clip.display()),
        )
        .await;
        assert_eq!(end, SessionEnd::Quit);
        assert!(output.contains("Published: https://www.youtube.com/watch?v=xyz"));
        assert_eq!(second.wizard().completed_steps().numbers(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_auth_error_is_shown_once() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let tokens = TokenLifecycle::new(store.clone());
        handle_callback("#error=access_denied", &tokens).unwrap();

        let mut first = session(&store, MockUploader::new());
        let mut out = Vec::new();
        first.start(&mut out).unwrap();
        let banner = String::from_utf8(out).unwrap();
        assert!(banner.contains("YouTube authentication failed: OAuth Error: access_denied"));

        let mut second = session(&store, MockUploader::new());
        let mut out = Vec::new();
        second.start(&mut out).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("authentication failed"));
    }

    #[tokio::test]
    async fn test_locked_steps_report_errors() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut session = session(&store, MockUploader::new());

        let (end, output) = run_script(&mut session, "audio track1\ntitle Hi\ngoto 5\nfrobnicate\n").await;
        assert_eq!(end, SessionEnd::Quit);
        assert!(output.contains("Error: Step 2 is not available yet"));
        assert!(output.contains("Error: Step 3 is not available yet"));
        assert!(output.contains("Error: Step 5 is not available yet"));
        assert!(output.contains("Unknown command: frobnicate"));
        assert_eq!(session.wizard().current_step(), Step::Upload);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_video_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"hello").unwrap();
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut session = session(&store, MockUploader::new());

        let script = format!(
            "upload {}\nupload {}\n",
            notes.display(),
            dir.path().join("missing.mp4").display()
        );
        let (_, output) = run_script(&mut session, &script).await;
        assert!(output.contains("is not a video file"));
        assert!(output.contains("cannot read"));
        assert!(session.wizard().completed_steps().is_empty());
    }

    #[tokio::test]
    async fn test_generate_fills_draft() {
        let dir = tempfile::tempdir().unwrap();
        let clip = write_clip(dir.path());
        let store: SharedStore = Arc::new(MemoryStore::new());

        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .withf(|request| request.summary.as_deref() == Some("beach day"))
            .times(1)
            .returning(|_| {
                Ok(VideoMetadata::new(
                    "Beach Day",
                    "Waves.",
                    vec!["beach".into(), "summer".into()],
                ))
            });

        let mut session =
            session(&store, MockUploader::new()).with_generator(Arc::new(generator));
        let script = format!(
            "upload {}\naudio track1\ngenerate beach day\nuntag summer\nsave\n",
            clip.display()
        );
        let (_, output) = run_script(&mut session, &script).await;

        assert!(output.contains("Title:       Beach Day"));
        let metadata = session.wizard().payload().metadata.as_ref().unwrap();
        assert_eq!(metadata.tags, vec!["beach"]);
        assert_eq!(session.wizard().current_step(), Step::Preview);
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let clip = write_clip(dir.path());
        let store: SharedStore = Arc::new(MemoryStore::new());

        let mut generator = MockGenerator::new();
        generator.expect_generate().times(1).returning(|_| {
            Err(GenerationError::RequestFailed {
                status: 503,
                message: "overloaded".into(),
            })
        });

        let mut session =
            session(&store, MockUploader::new()).with_generator(Arc::new(generator));
        let script = format!("upload {}\naudio track1\ngenerate\n", clip.display());
        let (_, output) = run_script(&mut session, &script).await;

        assert!(output.contains("Error: AI metadata generation failed"));
        assert!(output.contains("You can try again."));
        assert!(session.draft().is_empty());
        assert!(session.wizard().payload().metadata.is_none());
    }

    #[tokio::test]
    async fn test_generate_without_generator() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut session = session(&store, MockUploader::new());
        let mut out = Vec::new();
        session
            .execute(Command::Generate(None), &mut out)
            .await
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_publish_without_token_hints_auth() {
        let dir = tempfile::tempdir().unwrap();
        let clip = write_clip(dir.path());
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut session = session(&store, MockUploader::new());

        let script = format!(
            "upload {}\naudio track1\ntitle T\ndescription D\ntag x\nsave\npreview\npublish\n",
            clip.display()
        );
        let (_, output) = run_script(&mut session, &script).await;
        assert!(output.contains("Error: Not authenticated with YouTube"));
        assert!(output.contains("Run `auth` to sign in with YouTube."));
    }

    #[tokio::test]
    async fn test_reset_clears_draft_and_progress() {
        let dir = tempfile::tempdir().unwrap();
        let clip = write_clip(dir.path());
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut session = session(&store, MockUploader::new());

        let script = format!(
            "upload {}\naudio track1\ntitle Draft\nreset\n",
            clip.display()
        );
        let (_, output) = run_script(&mut session, &script).await;
        assert!(output.contains("Started over."));
        assert!(session.draft().is_empty());
        assert!(session.wizard().payload().is_empty());
        assert_eq!(session.wizard().current_step(), Step::Upload);
    }

    #[tokio::test]
    async fn test_load_video_derives_mime() {
        let dir = tempfile::tempdir().unwrap();
        let clip = write_clip(dir.path());
        let handle = load_video(&clip).await.unwrap();
        assert_eq!(
            handle.descriptor(),
            VideoDescriptor {
                name: "clip.mp4".into(),
                mime_type: "video/mp4".into(),
                size_bytes: 10,
            }
        );
    }
}
