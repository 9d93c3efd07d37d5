use crate::dispatcher::{EventDispatcher, Response};
use std::convert::Infallible;
use tracing::debug;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reject::{LengthRequired, MethodNotAllowed, PayloadTooLarge};
use warp::{Filter, Rejection};

const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn routes(
    dispatcher: EventDispatcher,
) -> impl Filter<Extract = (Response,), Error = Infallible> + Clone {
    warp::post()
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and_then(move |body| handle_event(body, dispatcher.clone()))
        .recover(handle_rejection)
        .unify()
}

async fn handle_event(body: Bytes, dispatcher: EventDispatcher) -> Result<Response, Infallible> {
    Ok(dispatcher.handle(&body).await)
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let status = if err.find::<MethodNotAllowed>().is_some() {
        StatusCode::METHOD_NOT_ALLOWED
    } else if err.find::<PayloadTooLarge>().is_some() {
        StatusCode::PAYLOAD_TOO_LARGE
    } else if err.find::<LengthRequired>().is_some() {
        StatusCode::LENGTH_REQUIRED
    } else {
        StatusCode::BAD_REQUEST
    };
    debug!(?err, %status, "rejected request");
    Ok(Response::status_text(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GreetingMap;
    use crate::dispatcher::tests::{config, RecordingPoster};
    use serde_json::json;
    use std::sync::Arc;

    fn filter(
        poster: Arc<RecordingPoster>,
    ) -> impl Filter<Extract = (Response,), Error = Infallible> + Clone {
        let greetings = GreetingMap::new([("hello", "wave")]).unwrap();
        routes(EventDispatcher::new(config(greetings), poster))
    }

    #[tokio::test]
    async fn challenge_is_plain_text() {
        let body = json!({ "token": "vtoken", "type": "url_verification", "challenge": "abc" });
        let res = warp::test::request()
            .method("POST")
            .path("/slack/events")
            .body(body.to_string())
            .reply(&filter(Arc::default()))
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["content-type"], "text/plain");
        assert_eq!(res.body().as_ref(), b"abc");
    }

    #[tokio::test]
    async fn message_delivery_reacts() {
        let poster = Arc::new(RecordingPoster::default());
        let body = json!({
            "token": "vtoken",
            "type": "event_callback",
            "event": {
                "type": "message",
                "channel": "CGREET",
                "channel_type": "channel",
                "user": "U1",
                "text": "hello there",
                "ts": "1.0"
            }
        });
        let res = warp::test::request()
            .method("POST")
            .body(body.to_string())
            .reply(&filter(poster.clone()))
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body().as_ref(), b"ok");
        assert_eq!(poster.calls.lock().unwrap()[0].emoji, "wave");
    }

    #[tokio::test]
    async fn bad_token_is_500() {
        let res = warp::test::request()
            .method("POST")
            .body(r#"{"token":"nope","type":"event_callback"}"#)
            .reply(&filter(Arc::default()))
            .await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body().as_ref(), b"Internal Server Error");
    }

    #[tokio::test]
    async fn other_methods_are_rejected() {
        let res = warp::test::request()
            .method("GET")
            .reply(&filter(Arc::default()))
            .await;

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.body().as_ref(), b"Method Not Allowed");
    }

    #[tokio::test]
    async fn missing_length_is_rejected() {
        let res = warp::test::request()
            .method("POST")
            .reply(&filter(Arc::default()))
            .await;

        assert_eq!(res.status(), StatusCode::LENGTH_REQUIRED);
        assert_eq!(res.body().as_ref(), b"Length Required");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let res = warp::test::request()
            .method("POST")
            .body(vec![b'x'; MAX_BODY_BYTES as usize + 1])
            .reply(&filter(Arc::default()))
            .await;

        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
