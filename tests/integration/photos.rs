use crate::common::{TestApp, routes};

const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0fake jpeg payload";

mod upload {
    use super::*;

    #[tokio::test]
    async fn succeeds_and_appends_a_random_hex_suffix() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        let res = app
            .upload(&token, "vacation", "beach.jpg", JPEG_BYTES.to_vec())
            .await;

        assert_eq!(res.status, 201, "{}", res.text);

        let display_name = res.body["display_name"].as_str().unwrap();
        let suffix = display_name
            .strip_prefix("vacation-")
            .expect("display name starts with the given name");
        assert_eq!(suffix.len(), 64);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );

        assert_eq!(res.body["content_type"], "image/jpeg");
        assert_eq!(res.body["size"], JPEG_BYTES.len() as i64);
        assert_eq!(app.stored_photo_count(), 1);
    }

    #[tokio::test]
    async fn same_name_twice_yields_distinct_display_names() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        let a = app
            .upload(&token, "vacation", "a.jpg", JPEG_BYTES.to_vec())
            .await;
        let b = app
            .upload(&token, "vacation", "b.jpg", JPEG_BYTES.to_vec())
            .await;

        assert_eq!(a.status, 201);
        assert_eq!(b.status, 201);
        assert_ne!(a.body["display_name"], b.body["display_name"]);
    }

    #[tokio::test]
    async fn name_shorter_than_eight_characters_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        let res = app
            .upload(&token, "beach", "beach.jpg", JPEG_BYTES.to_vec())
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        // The message states the threshold it enforces.
        assert!(res.body["message"].as_str().unwrap().contains("8"));
        assert_eq!(app.stored_photo_count(), 0);
    }

    #[tokio::test]
    async fn name_with_path_separators_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        let res = app
            .upload(&token, "../../../etc/passwd", "x.jpg", JPEG_BYTES.to_vec())
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        // `name` without `photo`.
        let form = reqwest::multipart::Form::new().text("name", "vacation");
        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::PHOTOS))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400);

        // `photo` without `name`.
        let part = reqwest::multipart::Part::bytes(JPEG_BYTES.to_vec()).file_name("x.jpg");
        let form = reqwest::multipart::Form::new().part("photo", part);
        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::PHOTOS))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_and_leaves_no_file() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        // Test config caps photos at 1 MB.
        let big = vec![0u8; 2 * 1024 * 1024];
        let res = app.upload(&token, "huge pano", "pano.jpg", big).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.stored_photo_count(), 0);
    }

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;

        let part = reqwest::multipart::Part::bytes(JPEG_BYTES.to_vec()).file_name("x.jpg");
        let form = reqwest::multipart::Form::new()
            .text("name", "vacation")
            .part("photo", part);
        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::PHOTOS))
            .multipart(form)
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 401);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn returns_only_the_callers_photos() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;

        app.upload(&alice, "alice pic", "a.jpg", JPEG_BYTES.to_vec())
            .await;
        app.upload(&bob, "bob picture", "b.jpg", JPEG_BYTES.to_vec())
            .await;

        let res = app.get_with_token(routes::PHOTOS, &alice).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["total"], 1);
        let name = res.body["photos"][0]["display_name"].as_str().unwrap();
        assert!(name.starts_with("alice pic-"));
    }

    #[tokio::test]
    async fn defaults_to_display_name_ascending() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        app.upload(&token, "zzz last photo", "z.jpg", JPEG_BYTES.to_vec())
            .await;
        app.upload(&token, "aaa first photo", "a.jpg", JPEG_BYTES.to_vec())
            .await;

        let res = app.get_with_token(routes::PHOTOS, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["total"], 2);
        let first = res.body["photos"][0]["display_name"].as_str().unwrap();
        let second = res.body["photos"][1]["display_name"].as_str().unwrap();
        assert!(first.starts_with("aaa first photo-"));
        assert!(second.starts_with("zzz last photo-"));
    }

    #[tokio::test]
    async fn sort_date_orders_by_upload_time_ascending() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        app.upload(&token, "zzz uploaded first", "z.jpg", JPEG_BYTES.to_vec())
            .await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        app.upload(&token, "aaa uploaded last", "a.jpg", JPEG_BYTES.to_vec())
            .await;

        let res = app
            .get_with_token(&format!("{}?sort=date", routes::PHOTOS), &token)
            .await;

        assert_eq!(res.status, 200);
        let first = res.body["photos"][0]["display_name"].as_str().unwrap();
        assert!(first.starts_with("zzz uploaded first-"));
    }

    #[tokio::test]
    async fn unrecognized_sort_falls_back_to_name_order() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        app.upload(&token, "zzz last photo", "z.jpg", JPEG_BYTES.to_vec())
            .await;
        app.upload(&token, "aaa first photo", "a.jpg", JPEG_BYTES.to_vec())
            .await;

        let res = app
            .get_with_token(&format!("{}?sort=bogus", routes::PHOTOS), &token)
            .await;

        assert_eq!(res.status, 200);
        let first = res.body["photos"][0]["display_name"].as_str().unwrap();
        assert!(first.starts_with("aaa first photo-"));
    }

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::PHOTOS).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod download {
    use super::*;

    #[tokio::test]
    async fn owner_gets_the_stored_bytes_back() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        let res = app
            .upload(&token, "vacation", "beach.jpg", JPEG_BYTES.to_vec())
            .await;
        let id = res.body["id"].as_i64().unwrap();

        let (status, content_type, bytes) =
            app.get_bytes(&routes::photo_file(id), &token).await;

        assert_eq!(status, 200);
        assert_eq!(content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(bytes, JPEG_BYTES);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;

        let res = app
            .upload(&alice, "alice pic", "a.jpg", JPEG_BYTES.to_vec())
            .await;
        let id = res.body["id"].as_i64().unwrap();

        let res = app.get_with_token(&routes::photo_file(id), &bob).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn nonexistent_id_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        let res = app.get_with_token(&routes::photo_file(9999), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn owner_delete_removes_record_and_file() {
        let app = TestApp::spawn().await;
        let token = app.register("alice").await;

        let res = app
            .upload(&token, "vacation", "beach.jpg", JPEG_BYTES.to_vec())
            .await;
        let id = res.body["id"].as_i64().unwrap();
        assert_eq!(app.stored_photo_count(), 1);

        let res = app.delete_with_token(&routes::photo(id), &token).await;
        assert_eq!(res.status, 204);

        // Record gone.
        let res = app.get_with_token(&routes::photo_file(id), &token).await;
        assert_eq!(res.status, 404);
        let list = app.get_with_token(routes::PHOTOS, &token).await;
        assert_eq!(list.body["total"], 0);

        // File gone.
        assert_eq!(app.stored_photo_count(), 0);
    }

    #[tokio::test]
    async fn non_owner_delete_leaves_everything_intact() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;

        let res = app
            .upload(&alice, "alice pic", "a.jpg", JPEG_BYTES.to_vec())
            .await;
        let id = res.body["id"].as_i64().unwrap();

        let res = app.delete_with_token(&routes::photo(id), &bob).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        // Both the record and the file survive.
        let list = app.get_with_token(routes::PHOTOS, &alice).await;
        assert_eq!(list.body["total"], 1);
        assert_eq!(app.stored_photo_count(), 1);
    }

    #[tokio::test]
    async fn nonexistent_id_is_not_found_for_any_caller() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;

        for token in [&alice, &bob] {
            let res = app.delete_with_token(&routes::photo(12345), token).await;
            assert_eq!(res.status, 404);
            assert_eq!(res.body["code"], "NOT_FOUND");
        }
    }

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app.delete_without_token(&routes::photo(1)).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}
