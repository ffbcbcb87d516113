use pretty_assertions::assert_eq;
use serde_json::json;
use smartjob_engine::{
    Backend, ClientSettings, CvUpload, FailureKind, JobRecommendationDto, RecommendationResponse,
    ReqwestBackend, SkillScoreDto, SkillsResponse,
};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("alice:pw")
const TOKEN: &str = "YWxpY2U6cHc=";

fn backend_for(server: &MockServer) -> ReqwestBackend {
    ReqwestBackend::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("backend")
}

fn cv() -> CvUpload {
    CvUpload::new("cv.pdf", b"%PDF-1.4 fake".to_vec())
}

#[tokio::test]
async fn probe_sends_basic_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/"))
        .and(header("authorization", "Basic YWxpY2U6cHc="))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server).probe_credential(TOKEN).await.expect("probe ok");
}

#[tokio::test]
async fn probe_rejection_carries_status_and_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .probe_credential(TOKEN)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
    assert_eq!(err.http_status(), Some(401));
    assert_eq!(err.detail.as_deref(), Some("Invalid credentials"));
    assert_eq!(err.message, "Unauthorized");
}

#[tokio::test]
async fn create_account_posts_plain_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/"))
        .and(body_json(json!({"username": "bob", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "username": "bob"})))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server)
        .create_account("bob", "hunter2")
        .await
        .expect("created");

    let requests = server.received_requests().await.expect("recording on");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn recommend_uploads_cv_field_and_decodes_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai_smartjob/recommend_from_cv/"))
        .and(header("authorization", "Basic YWxpY2U6cHc="))
        .and(body_string_contains("name=\"fichier_cv\""))
        .and(body_string_contains("filename=\"cv.pdf\""))
        .and(body_string_contains("application/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recommended_jobs": [
                {"title": "AI Engineer", "company": "Acme", "location": "Paris", "description": "DL"}
            ],
            "career_recommendation_text": "Go deep."
        })))
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .recommend_from_cv(TOKEN, cv())
        .await
        .expect("recommendations");
    assert_eq!(
        response,
        RecommendationResponse {
            recommended_jobs: vec![JobRecommendationDto {
                title: Some("AI Engineer".into()),
                company: Some("Acme".into()),
                location: Some("Paris".into()),
                description: Some("DL".into()),
            }],
            career_recommendation_text: "Go deep.".into(),
        }
    );
}

#[tokio::test]
async fn extract_skills_decodes_scores() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai_smartjob/extract_skills_from_cv/"))
        .and(body_string_contains("name=\"fichier_cv\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "extracted_skills": [{"skill": "Python", "score": 92}, {"skill": "SQL", "score": 40.5}]
        })))
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .extract_skills_from_cv(TOKEN, cv())
        .await
        .expect("skills");
    assert_eq!(
        response,
        SkillsResponse {
            extracted_skills: vec![
                SkillScoreDto {
                    skill: "Python".into(),
                    score: 92.0,
                },
                SkillScoreDto {
                    skill: "SQL".into(),
                    score: 40.5,
                },
            ],
        }
    );
}

#[tokio::test]
async fn error_without_json_detail_has_no_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai_smartjob/extract_skills_from_cv/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .extract_skills_from_cv(TOKEN, cv())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.detail, None);
    assert_eq!(err.message, "Internal Server Error");
}

#[tokio::test]
async fn malformed_success_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai_smartjob/recommend_from_cv/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .recommend_from_cv(TOKEN, cv())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidResponse);
}

#[tokio::test]
async fn feedback_posts_rating_and_comment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedback/"))
        .and(header("authorization", "Basic YWxpY2U6cHc="))
        .and(body_json(json!({"rating": 5, "comment": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server)
        .submit_feedback(TOKEN, 5, "")
        .await
        .expect("feedback ok");
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(ClientSettings {
        base_url: format!("{}/api", server.uri()),
        ..ClientSettings::default()
    })
    .expect("backend");
    backend.probe_credential(TOKEN).await.expect("probe ok");
}

#[tokio::test]
async fn unreachable_backend_is_network_failure() {
    let backend = ReqwestBackend::new(ClientSettings {
        base_url: "http://127.0.0.1:1".to_string(),
        ..ClientSettings::default()
    })
    .expect("backend");

    let err = backend.probe_credential(TOKEN).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestBackend::new(ClientSettings {
        base_url: "not a url".to_string(),
        ..ClientSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
