use serde_json::json;

use crate::common::{MAX_UPLOAD_SIZE, TestApp, routes};

/// Regular files directly under the media directory.
fn stored_media(app: &TestApp) -> Vec<String> {
    std::fs::read_dir(app.upload_root())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect()
}

mod media_upload {
    use super::*;

    #[tokio::test]
    async fn upload_returns_created_record() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(routes::MEDIA_UPLOAD, "example.png", b"PNG_DATA".to_vec(), "image/png")
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["originalName"], "example.png");
        assert_eq!(res.body["isActive"], true);
        assert_eq!(res.body["external"], false);
        assert!(res.url().starts_with("/uploads/"));
        assert!(!res.file_name().contains('.'));
        assert_eq!(std::fs::read(app.blob_path(res.url())).unwrap(), b"PNG_DATA");
    }

    #[tokio::test]
    async fn any_file_type_is_accepted() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(
                routes::MEDIA_UPLOAD,
                "archive.zip",
                b"PK".to_vec(),
                "application/zip",
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.upload_without_file(routes::MEDIA_UPLOAD).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
        assert_eq!(res.message(), "File is required");
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(routes::MEDIA_UPLOAD, "empty.png", Vec::new(), "image/png")
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.message(), "File is required");
        assert!(stored_media(&app).is_empty());
        assert_eq!(app.get(routes::MEDIA).await.body, json!([]));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(
                routes::MEDIA_UPLOAD,
                "big.bin",
                vec![0u8; MAX_UPLOAD_SIZE + 1],
                "application/octet-stream",
            )
            .await;

        assert_eq!(res.status, 413, "{}", res.text);
        assert_eq!(res.code(), "PAYLOAD_TOO_LARGE");
        assert!(stored_media(&app).is_empty());
        assert_eq!(app.get(routes::MEDIA).await.body, json!([]));
    }

    #[tokio::test]
    async fn identical_uploads_are_independent() {
        let app = TestApp::spawn().await;

        let a = app.create_media("same.png", b"same bytes").await;
        let b = app.create_media("same.png", b"same bytes").await;

        assert_ne!(a.id(), b.id());
        assert_ne!(a.url(), b.url());
        assert!(app.blob_path(a.url()).exists());
        assert!(app.blob_path(b.url()).exists());
    }
}

mod media_read {
    use super::*;

    #[tokio::test]
    async fn list_returns_every_record() {
        let app = TestApp::spawn().await;
        let first = app.create_media("a.png", b"a").await;
        let second = app.create_media("b.png", b"b").await;
        app.patch(&routes::media(second.id()), &json!({ "isActive": false }))
            .await;

        let res = app.get(routes::MEDIA).await;

        assert_eq!(res.status, 200);
        let ids: Vec<i64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![first.id() as i64, second.id() as i64]);
    }

    #[tokio::test]
    async fn find_one_returns_record() {
        let app = TestApp::spawn().await;
        let created = app.create_media("a.png", b"a").await;

        let res = app.get(&routes::media(created.id())).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["url"], created.url());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::media(9999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
        assert_eq!(res.message(), "Media with ID 9999 not found");
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_json_validation_error() {
        let app = TestApp::spawn().await;

        for res in [
            app.get("/api/media/abc").await,
            app.patch("/api/media/abc", &json!({ "isActive": false })).await,
            app.delete("/api/media/abc").await,
        ] {
            assert_eq!(res.status, 400, "{}", res.text);
            assert_eq!(res.code(), "VALIDATION_ERROR");
            assert!(!res.message().is_empty());
        }
    }

    #[tokio::test]
    async fn file_round_trips_by_url() {
        let app = TestApp::spawn().await;
        let created = app.create_media("photo.jpg", b"\x00\x01binary\xff").await;

        let file = app.get_file(&routes::media_file(created.url())).await;

        assert_eq!(file.status, 200);
        assert_eq!(file.bytes, b"\x00\x01binary\xff");
        assert_eq!(file.content_type.as_deref(), Some("application/octet-stream"));
    }

    #[tokio::test]
    async fn file_accepts_bare_name() {
        let app = TestApp::spawn().await;
        let created = app.create_media("a.png", b"bare").await;

        let file = app.get_file(&routes::media_file(created.file_name())).await;

        assert_eq!(file.status, 200);
        assert_eq!(file.bytes, b"bare");
    }

    #[tokio::test]
    async fn file_without_url_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::MEDIA_FILE).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.message(), "Path is required");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::media_file("/uploads/nope")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::media_file("../cms.db")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}

mod media_update {
    use super::*;

    #[tokio::test]
    async fn patch_changes_only_given_fields() {
        let app = TestApp::spawn().await;
        let created = app.create_media("a.png", b"a").await;

        let res = app
            .patch(
                &routes::media(created.id()),
                &json!({ "isActive": false, "external": true }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["isActive"], false);
        assert_eq!(res.body["external"], true);
        assert_eq!(res.body["url"], created.url());
        assert_eq!(res.body["originalName"], "a.png");
    }

    #[tokio::test]
    async fn patch_null_clears_original_name() {
        let app = TestApp::spawn().await;
        let created = app.create_media("a.png", b"a").await;

        let res = app
            .patch(&routes::media(created.id()), &json!({ "originalName": null }))
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["originalName"].is_null());
    }

    #[tokio::test]
    async fn patch_url_is_not_checked_against_disk() {
        let app = TestApp::spawn().await;
        let created = app.create_media("a.png", b"a").await;

        let res = app
            .patch(
                &routes::media(created.id()),
                &json!({ "url": "https://cdn.example.com/a.png" }),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["url"], "https://cdn.example.com/a.png");
    }

    #[tokio::test]
    async fn patch_unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .patch(&routes::media(4242), &json!({ "isActive": false }))
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn patch_with_blank_url_is_rejected() {
        let app = TestApp::spawn().await;
        let created = app.create_media("a.png", b"a").await;

        let res = app
            .patch(&routes::media(created.id()), &json!({ "url": "  " }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn patch_with_wrong_type_is_rejected() {
        let app = TestApp::spawn().await;
        let created = app.create_media("a.png", b"a").await;

        let res = app
            .patch(&routes::media(created.id()), &json!({ "isActive": "yes" }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}

mod media_delete {
    use super::*;

    #[tokio::test]
    async fn delete_removes_blob_and_record() {
        let app = TestApp::spawn().await;
        let created = app.create_media("a.png", b"a").await;
        let blob = app.blob_path(created.url());
        assert!(blob.exists());

        let res = app.delete(&routes::media(created.id())).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.id(), created.id());
        assert!(!blob.exists());
        assert_eq!(app.get(&routes::media(created.id())).await.status, 404);
    }

    #[tokio::test]
    async fn delete_tolerates_missing_blob() {
        let app = TestApp::spawn().await;
        let created = app.create_media("a.png", b"a").await;
        std::fs::remove_file(app.blob_path(created.url())).unwrap();

        let res = app.delete(&routes::media(created.id())).await;

        assert_eq!(res.status, 200);
        assert_eq!(app.get(&routes::media(created.id())).await.status, 404);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::media(777)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }
}

mod openapi {
    use super::*;

    #[tokio::test]
    async fn document_lists_asset_routes() {
        let app = TestApp::spawn().await;

        let res = app.get("/api-docs/openapi.json").await;

        assert_eq!(res.status, 200);
        let paths = &res.body["paths"];
        for path in [
            "/api/media/upload",
            "/api/media/file",
            "/api/media/{id}",
            "/api/documents/upload",
            "/api/documents/file",
            "/api/documents/{id}",
        ] {
            assert!(paths.get(path).is_some(), "missing {path}");
        }
    }
}
