use serde_json::json;

use cms_server::asset::AssetPolicy;
use cms_server::asset::content_type::{DOCX, PDF, PPTX, TEXT_PLAIN, XLSX};

use crate::common::{MAX_UPLOAD_SIZE, TestApp, routes};

/// Regular files directly under the documents directory.
fn stored_documents(app: &TestApp) -> Vec<String> {
    std::fs::read_dir(app.upload_root().join("documents"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect()
}

mod document_upload {
    use super::*;

    #[tokio::test]
    async fn upload_returns_created_record() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(routes::DOCUMENTS_UPLOAD, "report.pdf", b"%PDF-1.7".to_vec(), PDF)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.url().starts_with("/uploads/documents/"));
        assert!(res.url().ends_with(".pdf"));
        assert!(res.body["originalName"].is_null());
        assert_eq!(res.body["isActive"], true);
        assert_eq!(res.body["external"], false);
        assert_eq!(std::fs::read(app.blob_path(res.url())).unwrap(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn disallowed_mime_type_writes_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(routes::DOCUMENTS_UPLOAD, "image.png", b"PNG".to_vec(), "image/png")
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
        assert!(res.message().starts_with("Invalid file type"));
        assert!(stored_documents(&app).is_empty());
        assert_eq!(app.get(routes::DOCUMENTS).await.body, json!([]));
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(routes::DOCUMENTS_UPLOAD, "empty.txt", Vec::new(), TEXT_PLAIN)
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.message(), "File is required");
        assert!(stored_documents(&app).is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(
                routes::DOCUMENTS_UPLOAD,
                "big.pdf",
                vec![b'%'; MAX_UPLOAD_SIZE + 1],
                PDF,
            )
            .await;

        assert_eq!(res.status, 413, "{}", res.text);
        assert_eq!(res.code(), "PAYLOAD_TOO_LARGE");
        assert!(stored_documents(&app).is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.upload_without_file(routes::DOCUMENTS_UPLOAD).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.message(), "File is required");
    }

    #[tokio::test]
    async fn identical_uploads_are_independent() {
        let app = TestApp::spawn().await;

        let a = app.create_document("a.txt", b"same", TEXT_PLAIN).await;
        let b = app.create_document("a.txt", b"same", TEXT_PLAIN).await;

        assert_ne!(a.id(), b.id());
        assert_ne!(a.url(), b.url());
        assert_eq!(stored_documents(&app).len(), 2);
    }

    #[tokio::test]
    async fn media_and_documents_are_separate_collections() {
        let app = TestApp::spawn().await;
        let doc = app.create_document("a.txt", b"doc", TEXT_PLAIN).await;
        app.create_media("a.png", b"media").await;

        let docs = app.get(routes::DOCUMENTS).await;
        assert_eq!(docs.body.as_array().unwrap().len(), 1);
        assert_eq!(docs.body[0]["url"], doc.url());
        assert_eq!(app.get(routes::MEDIA).await.body.as_array().unwrap().len(), 1);
    }
}

mod document_file {
    use super::*;

    #[tokio::test]
    async fn each_extension_resolves_its_content_type() {
        let app = TestApp::spawn().await;

        for (name, mime) in [
            ("notes.txt", TEXT_PLAIN),
            ("letter.docx", DOCX),
            ("sheet.xlsx", XLSX),
            ("slides.pptx", PPTX),
            ("paper.pdf", PDF),
        ] {
            let bytes = format!("contents of {name}").into_bytes();
            let created = app.create_document(name, &bytes, mime).await;

            let file = app.get_file(&routes::document_file(created.file_name())).await;

            assert_eq!(file.status, 200, "{name}");
            assert_eq!(file.content_type.as_deref(), Some(mime), "{name}");
            assert_eq!(file.bytes, bytes, "{name}");
        }
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let app = TestApp::spawn().await;
        std::fs::write(app.upload_root().join("documents/stray.png"), b"png").unwrap();

        let res = app.get(&routes::document_file("stray.png")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
        assert!(res.message().starts_with("Unsupported file type"));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::document_file("missing.pdf")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.message(), "File not found");
    }

    #[tokio::test]
    async fn file_name_is_required() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::DOCUMENTS_FILE).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.message(), "fileName query parameter is required");
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::document_file("../../cms.db")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}

mod document_records {
    use super::*;

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::document(31337)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
        assert_eq!(res.message(), "Document with ID 31337 not found");
    }

    #[tokio::test]
    async fn patch_updates_flags() {
        let app = TestApp::spawn().await;
        let created = app.create_document("a.txt", b"a", TEXT_PLAIN).await;

        let res = app
            .patch(&routes::document(created.id()), &json!({ "isActive": false }))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["isActive"], false);
        assert_eq!(app.get(&routes::document(created.id())).await.body["isActive"], false);
    }

    #[tokio::test]
    async fn patch_unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .patch(&routes::document(5), &json!({ "external": true }))
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn delete_keeps_blob_on_disk() {
        let app = TestApp::spawn().await;
        let created = app.create_document("a.txt", b"kept", TEXT_PLAIN).await;

        let res = app.delete(&routes::document(created.id())).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.id(), created.id());
        assert_eq!(app.get(&routes::document(created.id())).await.status, 404);
        assert_eq!(std::fs::read(app.blob_path(created.url())).unwrap(), b"kept");
    }

    #[tokio::test]
    async fn delete_removes_blob_when_configured() {
        let documents = AssetPolicy {
            delete_blob_on_remove: true,
            ..AssetPolicy::documents()
        };
        let app = TestApp::spawn_with(AssetPolicy::media(), documents).await;
        let created = app.create_document("a.txt", b"gone", TEXT_PLAIN).await;

        let res = app.delete(&routes::document(created.id())).await;

        assert_eq!(res.status, 200);
        assert!(!app.blob_path(created.url()).exists());
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_json_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get("/api/documents/12x").await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::document(8)).await;

        assert_eq!(res.status, 404);
    }
}
