//! End-to-end redirect scenarios.
//!
//! Each "session" is a fresh `Wizard` over a `FileStore` pointing at the same
//! file, which is what a process restart after the OAuth redirect looks like.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use vtune_auth::{handle_callback, CallbackStatus, OAuthConfig};
use vtune_models::{AudioTrack, Step, VideoHandle, VideoMetadata};
use vtune_storage::{FileStore, SharedStore, StateStore, StorageError, StorageResult};
use vtune_wizard::{RehydrateOutcome, Wizard, WizardError, SNAPSHOT_KEY};
use vtune_youtube::{UploadResult, VideoUploader};

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

fn session(path: &Path) -> Wizard {
    let store: SharedStore = Arc::new(FileStore::new(path));
    Wizard::new(store)
}

fn clip() -> VideoHandle {
    VideoHandle::new("clip.mp4", "video/mp4", b"clip-bytes".to_vec())
}

fn oauth() -> OAuthConfig {
    OAuthConfig::default().with_client_id(Some("client-123.apps.googleusercontent.com".into()))
}

/// Steps 1-4 of the happy path, then the authorize redirect.
fn run_until_redirect(path: &Path) -> url::Url {
    let mut wizard = session(path);
    assert_eq!(wizard.rehydrate().unwrap(), RehydrateOutcome::Empty);

    wizard.commit_upload(clip()).unwrap();
    wizard
        .commit_audio(AudioTrack::find("track3").unwrap())
        .unwrap();
    wizard
        .commit_metadata(VideoMetadata::new("T", "D", vec!["x".into(), "y".into()]))
        .unwrap();
    wizard.commit_preview().unwrap();

    wizard.begin_authorization(&oauth()).unwrap()
}

#[tokio::test]
async fn test_redirect_round_trip_and_publish() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let authorize_url = run_until_redirect(&path);
    assert!(authorize_url
        .query_pairs()
        .any(|(k, v)| k == "scope" && v == "https://www.googleapis.com/auth/youtube.upload"));

    // Callback route, in its own session.
    {
        let callback_store: SharedStore = Arc::new(FileStore::new(&path));
        let tokens = vtune_auth::TokenLifecycle::new(callback_store);
        let outcome = handle_callback(
            "http://localhost:9002/youtube-callback#access_token=abc123&token_type=Bearer&expires_in=3599",
            &tokens,
        )
        .unwrap();
        assert_eq!(outcome.status, CallbackStatus::Success);
        assert_eq!(outcome.redirect_to, "/");
    }

    // Back at the wizard root.
    let mut wizard = session(&path);
    assert_eq!(wizard.rehydrate().unwrap(), RehydrateOutcome::Restored);
    assert_eq!(wizard.current_step(), Step::Publish);
    assert_eq!(wizard.completed_steps().numbers(), vec![1, 2, 3, 4]);
    assert_eq!(wizard.payload().audio_selection.as_ref().unwrap().id, "track3");
    assert_eq!(
        wizard.payload().video_descriptor.as_ref().unwrap().name,
        "clip.mp4"
    );
    assert!(wizard.payload().video.is_none());
    assert!(wizard.needs_video_reacquisition());

    let credentials = wizard.credentials();
    assert_eq!(credentials.access_token.unwrap().secret(), "abc123");
    assert_eq!(credentials.auth_error, None);

    wizard.reacquire_video(clip()).unwrap();
    assert!(!wizard.needs_video_reacquisition());

    let mut uploader = MockUploader::new();
    uploader
        .expect_upload()
        .times(1)
        .returning(|_, _, _| Ok("xyz".to_string()));

    let result = wizard.publish(&uploader).await.unwrap();
    assert_eq!(result.url, "https://www.youtube.com/watch?v=xyz");
    assert_eq!(wizard.completed_steps().numbers(), vec![1, 2, 3, 4, 5]);
    assert!(!wizard.tokens().has_valid_token());

    // A later reload does not resurrect anything.
    let mut later = session(&path);
    assert_eq!(later.rehydrate().unwrap(), RehydrateOutcome::Empty);
    assert_eq!(later.current_step(), Step::Upload);
    assert!(!later.tokens().has_valid_token());
}

#[test]
fn test_access_denied_keeps_progress() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    run_until_redirect(&path);

    let store: SharedStore = Arc::new(FileStore::new(&path));
    let tokens = vtune_auth::TokenLifecycle::new(store);
    let outcome = handle_callback("#error=access_denied", &tokens).unwrap();
    assert_eq!(outcome.status, CallbackStatus::ProviderError);
    assert_eq!(outcome.message, "Authentication failed: access_denied");

    let mut wizard = session(&path);
    wizard.rehydrate().unwrap();
    assert_eq!(wizard.current_step(), Step::Publish);
    assert!(wizard.completed_steps().contains(Step::Preview));
    assert!(!wizard.needs_video_reacquisition());

    let credentials = wizard.credentials();
    assert_eq!(credentials.access_token, None);
    assert_eq!(
        credentials.auth_error.as_deref(),
        Some("OAuth Error: access_denied")
    );
    // Shown once.
    assert_eq!(wizard.credentials().auth_error, None);

    // Retrying authentication works without losing step 4.
    let url = wizard.begin_authorization(&oauth()).unwrap();
    assert_eq!(url.host_str(), Some("accounts.google.com"));
    assert!(wizard.completed_steps().contains(Step::Preview));
}

/// Store whose writes always fail.
struct ReadOnlyStore;

impl StateStore for ReadOnlyStore {
    fn save(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::write(
            "read-only",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        ))
    }

    fn load(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn delete(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }
}

#[test]
fn test_no_redirect_url_when_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let mut wizard = session(&path);
    wizard.commit_upload(clip()).unwrap();
    wizard
        .commit_audio(AudioTrack::find("track1").unwrap())
        .unwrap();
    wizard
        .commit_metadata(VideoMetadata::new("T", "D", vec!["x".into()]))
        .unwrap();
    wizard.commit_preview().unwrap();
    assert!(wizard.begin_authorization(&oauth()).is_ok());
    assert!(FileStore::new(&path).load(SNAPSHOT_KEY).unwrap().is_some());

    let mut broken = Wizard::new(Arc::new(ReadOnlyStore));
    broken.commit_upload(clip()).unwrap();
    broken
        .commit_audio(AudioTrack::find("track1").unwrap())
        .unwrap();
    broken
        .commit_metadata(VideoMetadata::new("T", "D", vec!["x".into()]))
        .unwrap();
    broken.commit_preview().unwrap();

    let err = broken.begin_authorization(&oauth()).unwrap_err();
    assert!(matches!(err, WizardError::Storage(_)));
}
