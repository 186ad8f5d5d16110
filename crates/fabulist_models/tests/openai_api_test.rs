use fabulist_core::{GenerateRequest, ImageRequest, Message};
use fabulist_interface::{FabulistDriver, ImageDriver};
use fabulist_models::{OpenAiDriver, OpenAiImageDriver};

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_openai_simple_generation() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let driver = OpenAiDriver::new("gpt-4o-mini".to_string())?;

    let request = GenerateRequest::new(vec![Message::user("Say 'test' and nothing else.")])
        .with_max_tokens(Some(10));

    let response = driver.generate(&request).await?;

    assert!(!response.text().is_empty());
    println!("Response: {}", response.text());
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_openai_image_generation() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let driver = OpenAiImageDriver::new("gpt-image-1".to_string())?;

    let request = ImageRequest::new(
        "A small dog digging under an oak tree",
        Some("watercolor".to_string()),
        None,
        None,
    );

    let response = driver.render(&request).await?;

    assert!(!response.source().is_empty());
    Ok(())
}

#[test]
fn test_with_api_key_reports_model() {
    let driver = OpenAiDriver::with_api_key(
        "sk-test".to_string(),
        "gpt-4o-mini".to_string(),
        "http://localhost:9/v1/".to_string(),
    );

    assert_eq!(driver.provider_name(), "openai");
    assert_eq!(driver.model_name(), "gpt-4o-mini");
}
