mod common;

use std::sync::{Arc, Mutex};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

use common::{png_bytes, RecordingSurface};
use promptpix::controller::Controller;
use promptpix::error::NETWORK_MESSAGE;
use promptpix::surface::DisplayView;
use promptpix::{
  ClientConfig, Error, GenerationResult, HttpImageService, ImageLoader,
  ImageService, Outcome, Prompt,
};

type Seen = Arc<Mutex<Vec<String>>>;

/// Mock generation server; the prompt picks the behaviour
async fn generate(
  State(seen): State<Seen>
, Json(body): Json<Value>
) -> Response
{   let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
    seen.lock().unwrap().push(prompt.clone());

    match prompt.as_str()
    {   "bad" => Json(json!({
          "success": false, "error": "bad prompt"
        })).into_response()
      , "silent" => Json(json!({ "success": false })).into_response()
      , "boom" => (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "success": false, "error": "ignored" }))
        ).into_response()
      , "garbled" => "<html>not json</html>".into_response()
      , "missing" => Json(json!({
          "success": true, "image_url": "/images/missing.png"
        })).into_response()
      , "corrupt" => Json(json!({
          "success": true, "image_url": "/images/corrupt.png"
        })).into_response()
      , _ => Json(json!({
          "success": true,
          "image_url": "/images/x.png",
          "image_path": "/srv/images/x.png",
          "message": "Image generated successfully"
        })).into_response()
    }
}

async fn png() -> Response
{   ([(header::CONTENT_TYPE, "image/png")], png_bytes()).into_response()
}

async fn corrupt() -> Response
{   ([(header::CONTENT_TYPE, "image/png")], "definitely not a png")
      .into_response()
}

async fn spawn_server() -> (String, Seen)
{   let seen: Seen = Arc::new(Mutex::new(vec![]));
    let app = Router::new()
      .route("/generate-image", post(generate))
      .route("/images/x.png", get(png))
      .route("/images/corrupt.png", get(corrupt))
      .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
      .await
      .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
      axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{}", addr), seen)
}

fn config_for(base_url: &str) -> ClientConfig
{   ClientConfig
    {   base_url: base_url.to_string()
      , ..ClientConfig::default()
    }
}

#[tokio::test]
async fn test_service_posts_prompt_and_returns_path()
{   let (base, seen) = spawn_server().await;
    let service = HttpImageService::new(&config_for(&base));

    let result = service
      .generate(&Prompt::parse("  a red fox  ").unwrap())
      .await;

    assert_eq!(
      assert_ok!(result),
      GenerationResult::Success { image_url: "/images/x.png".to_string() }
    );
    assert_eq!(*seen.lock().unwrap(), vec!["a red fox"]);
    assert_ok!(service.shutdown().await);
}

#[tokio::test]
async fn test_service_reports_application_failure()
{   let (base, _) = spawn_server().await;
    let service = HttpImageService::new(&config_for(&base));

    let bad = service.generate(&Prompt::parse("bad").unwrap()).await;
    assert_eq!(
      assert_ok!(bad),
      GenerationResult::Failure { message: "bad prompt".to_string() }
    );

    let silent = service.generate(&Prompt::parse("silent").unwrap()).await;
    assert_eq!(
      assert_ok!(silent),
      GenerationResult::Failure {
        message: "Failed to generate image".to_string()
      }
    );
}

#[tokio::test]
async fn test_service_maps_non_2xx_to_http_error()
{   let (base, _) = spawn_server().await;
    let service = HttpImageService::new(&config_for(&base));

    let result = service.generate(&Prompt::parse("boom").unwrap()).await;
    assert_eq!(assert_err!(result), Error::Http(500));
}

#[tokio::test]
async fn test_service_maps_garbled_body_to_network_error()
{   let (base, _) = spawn_server().await;
    let service = HttpImageService::new(&config_for(&base));

    let result = service.generate(&Prompt::parse("garbled").unwrap()).await;
    assert!(matches!(assert_err!(result), Error::Network(_)));
}

#[tokio::test]
async fn test_service_connection_refused_is_network_error()
{   // nothing listens on the port once the listener is dropped
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
      .await
      .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let service = HttpImageService::new(
      &config_for(&format!("http://{}", addr))
    );
    let result = service.generate(&Prompt::parse("anything").unwrap()).await;
    assert!(matches!(assert_err!(result), Error::Network(_)));
}

#[tokio::test]
async fn test_loader_fetches_and_decodes()
{   let (base, _) = spawn_server().await;
    let service = HttpImageService::new(&config_for(&base));
    let url = format!("{}/images/x.png", base);

    let image = assert_ok!(service.load(&url).await);
    assert_eq!(image.url, url);
    assert_eq!((image.width, image.height), (2, 2));
    assert_eq!(image.bytes, png_bytes());

    let corrupt = service
      .load(&format!("{}/images/corrupt.png", base))
      .await;
    assert!(matches!(assert_err!(corrupt), Error::ImageLoad(_)));

    let missing = service
      .load(&format!("{}/images/missing.png", base))
      .await;
    assert!(matches!(assert_err!(missing), Error::ImageLoad(_)));
}

fn http_controller(
  surface: &Arc<RecordingSurface>
, config: ClientConfig
) -> Controller
{   let service = Arc::new(HttpImageService::new(&config));
    let generator: Arc<dyn ImageService> = service.clone();
    let loader: Arc<dyn ImageLoader> = service;
    Controller::new(surface.handles(), generator, loader, config)
}

#[tokio::test]
async fn test_cycle_against_server()
{   let (base, _) = spawn_server().await;
    let surface = RecordingSurface::new("a red fox");
    let mut ctl = http_controller(&surface, config_for(&base));

    let outcome = ctl.generate_image().await;

    let expected = format!("{}/images/x.png", base);
    assert_eq!(outcome, Outcome::Displayed { image_url: expected.clone() });
    match surface.display()
    {   Some(DisplayView::Result(view)) => assert_eq!(view.src(), expected)
      , other => panic!("expected a result view, got {:?}", other)
    }
    assert!(surface.controls().input_enabled);
}

#[tokio::test]
async fn test_cycle_failures_against_server()
{   let (base, _) = spawn_server().await;

    let cases = vec![
      ("bad", "bad prompt")
    , ("boom", NETWORK_MESSAGE)
    , ("garbled", NETWORK_MESSAGE)
    , ("missing", "Failed to load the generated image")
    , ("corrupt", "Failed to load the generated image")
    ];

    for (prompt, banner) in cases
    {   let surface = RecordingSurface::new(prompt);
        let mut ctl = http_controller(&surface, config_for(&base));

        let outcome = ctl.generate_image().await;

        assert!(
          matches!(outcome, Outcome::Failed(_)),
          "{} should fail", prompt
        );
        assert_eq!(surface.banner_texts(), vec![banner], "for {}", prompt);
        assert!(surface.controls().button_enabled);
    }
}
