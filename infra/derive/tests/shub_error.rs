use shub_derive::shub_error;
use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
#[error("boom")]
struct UpstreamError;

#[shub_error]
enum SampleError {
    #[error("Upstream failure{}: {source}", format_context(.context))]
    Upstream {
        #[source]
        source: UpstreamError,
        context: Option<Cow<'static, str>>,
    },
    #[error("Rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[test]
fn from_source_maps_to_variant() {
    let err: SampleError = UpstreamError.into();
    assert!(matches!(err, SampleError::Upstream { context: None, .. }));
}

#[test]
fn context_attaches_to_source_results() {
    let result: Result<(), UpstreamError> = Err(UpstreamError);
    let err = result.context("while syncing").unwrap_err();
    match err {
        SampleError::Upstream { context, .. } => {
            assert_eq!(context.as_deref(), Some("while syncing"));
        },
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn context_attaches_to_own_results() {
    let result: Result<(), SampleError> =
        Err(SampleError::Rejected { message: "nope".into(), context: None });
    let err = result.context("during review").unwrap_err();
    assert_eq!(err.to_string(), "Rejected (during review): nope");
}

#[test]
fn internal_accepts_strings() {
    let err: SampleError = "static fault".into();
    assert_eq!(err.to_string(), "Internal error: static fault");

    let err: SampleError = format!("dynamic {}", "fault").into();
    assert!(matches!(err, SampleError::Internal { .. }));
}
