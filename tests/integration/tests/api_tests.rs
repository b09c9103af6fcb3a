//! API Integration Tests
//!
//! Each test starts its own server over the in-memory ledger, so no
//! external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use chrono::Duration;
use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Generate one code through the admin API and return its identifier
async fn create_code(server: &TestServer, days: i32, max_uses: i32) -> String {
    let response = server
        .post_admin("/api/admin/codes", &GenerateCodes::single(days, max_uses))
        .await
        .unwrap();
    let batch: CodeBatch = assert_json(response, StatusCode::CREATED).await.unwrap();
    batch.created[0].code.clone()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["ledger"], "healthy");
}

// ============================================================================
// Vote Webhook Tests
// ============================================================================

#[tokio::test]
async fn test_webhook_rejects_missing_or_wrong_secret() {
    let server = TestServer::start().await.unwrap();
    let body = vote_payload(unique_snowflake());

    let response = server.post("/webhook/vote", &body).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
        .await
        .unwrap();

    let response = server
        .post_webhook("/webhook/vote", "not-the-secret", &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    // Nothing was recorded
    let response = server.get("/api/votes").await.unwrap();
    let votes: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(votes["count"], 0);
}

#[tokio::test]
async fn test_webhook_records_vote_on_both_paths() {
    let server = TestServer::start().await.unwrap();
    let user = unique_snowflake();
    server.directory.set_username(user, "alice");

    let response = server
        .post_webhook("/webhook/vote", WEBHOOK_SECRET, &vote_payload(user))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Vote processed");

    let response = server
        .post_webhook("/topgg/webhook", WEBHOOK_SECRET, &vote_payload(user))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get(&format!("/api/votes/user/{user}"))
        .await
        .unwrap();
    let info: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(info["totalVotes"], 2);
    assert_eq!(info["username"], "alice");
}

#[tokio::test]
async fn test_webhook_rejects_malformed_body() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_webhook("/webhook/vote", WEBHOOK_SECRET, &json!({ "type": "upvote" }))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_ten_votes_keep_full_history() {
    let server = TestServer::start().await.unwrap();
    let user = unique_snowflake();

    for _ in 0..10 {
        server.vote(&vote_payload(user)).await.unwrap();
        server.clock.advance(Duration::hours(12));
    }

    let response = server
        .get(&format!("/api/votes/user/{user}"))
        .await
        .unwrap();
    let info: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(info["totalVotes"], 10);
    assert_eq!(info["voteHistory"].as_array().unwrap().len(), 10);

    let recent = info["recentVotes"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0], info["lastVoteAt"]);
}

// ============================================================================
// Leaderboard Tests
// ============================================================================

#[tokio::test]
async fn test_leaderboard_orders_by_votes() {
    let server = TestServer::start().await.unwrap();
    let (light, heavy, middle) = (unique_snowflake(), unique_snowflake(), unique_snowflake());

    for (user, votes) in [(light, 1), (heavy, 4), (middle, 2)] {
        for _ in 0..votes {
            server.vote(&vote_payload(user)).await.unwrap();
        }
    }

    let response = server.get("/api/votes/top/2").await.unwrap();
    let board: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(board["count"], 2);

    let top = board["topVoters"].as_array().unwrap();
    assert_eq!(top[0]["rank"], 1);
    assert_eq!(top[0]["userId"], heavy.to_string());
    assert_eq!(top[0]["totalVotes"], 4);
    assert_eq!(top[1]["userId"], middle.to_string());
}

#[tokio::test]
async fn test_leaderboard_limit_handling() {
    let server = TestServer::start().await.unwrap();
    for _ in 0..12 {
        server.vote(&vote_payload(unique_snowflake())).await.unwrap();
    }

    // Unparseable limit falls back to the default of 10
    let response = server.get("/api/votes/top/lots").await.unwrap();
    let board: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(board["count"], 10);

    let response = server.get("/api/votes/top/0").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unknown_voter_is_not_found() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .get(&format!("/api/votes/user/{}", unique_snowflake()))
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_VOTER")
        .await
        .unwrap();

    let response = server.get("/api/votes/user/not-a-number").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_PATH_PARAMETER")
        .await
        .unwrap();
}

// ============================================================================
// Code Administration Tests
// ============================================================================

#[tokio::test]
async fn test_admin_endpoints_require_key() {
    let server = TestServer::start().await.unwrap();

    let response = server.post("/api/admin/codes", &json!({})).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get("/api/codes").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .client
        .post(format!("{}/api/admin/reconcile", server.base_url()))
        .header("x-admin-key", "wrong")
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_generate_codes_with_defaults() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_admin("/api/admin/codes", &GenerateCodes::default())
        .await
        .unwrap();
    let batch: CodeBatch = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert!(batch.success);
    assert_eq!(batch.requested, 15);
    assert_eq!(batch.premium_days, 31);
    assert_eq!(batch.max_uses, 1);
    assert_eq!(batch.created.len(), 15);
    assert!(batch.failures.is_empty());
    assert!(batch.created.iter().all(|c| c.is_active && c.current_uses == 0));
    assert!(batch.created.iter().all(|c| c.created_by == "admin-api"));

    let response = server.get_admin("/api/admin/codes/active").await.unwrap();
    let active: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(active["count"], 15);
}

#[tokio::test]
async fn test_generate_codes_with_prefix() {
    let server = TestServer::start().await.unwrap();
    let request = GenerateCodes {
        quantity: Some(3),
        days: Some(7),
        prefix: Some("vip".into()),
        max_uses: Some(5),
    };

    let response = server.post_admin("/api/admin/codes", &request).await.unwrap();
    let batch: CodeBatch = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(batch.created.len(), 3);
    assert!(batch.created.iter().all(|c| c.code.starts_with("VIP-")));
    assert!(batch.created.iter().all(|c| c.remaining_uses == 5));
}

#[tokio::test]
async fn test_generate_codes_rejects_bad_input() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_admin("/api/admin/codes", &json!({ "quantity": 0 }))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();

    let response = server
        .post_admin("/api/admin/codes", &json!({ "prefix": "no-dash" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_public_code_lookup_hides_creator() {
    let server = TestServer::start().await.unwrap();
    let code = create_code(&server, 31, 2).await;

    let response = server.get(&format!("/api/codes/{code}")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["code"], code.as_str());
    assert_eq!(body["maxUses"], 2);
    assert!(body.get("createdBy").is_none());

    let response = server.get("/api/codes/NOPE-0000").await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_CODE")
        .await
        .unwrap();
}

// ============================================================================
// Redemption Tests
// ============================================================================

#[tokio::test]
async fn test_redeem_grants_premium() {
    let server = TestServer::start().await.unwrap();
    let (guild, role) = (unique_snowflake(), unique_snowflake());
    server.directory.add_role(guild, role);
    let code = create_code(&server, 31, 1).await;

    let response = server
        .post_admin(
            &format!("/api/admin/guilds/{guild}/redeem"),
            &Redeem::new(&code.to_lowercase(), role),
        )
        .await
        .unwrap();
    let redemption: Redemption = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(redemption.guild_id, guild.to_string());
    assert_eq!(redemption.code, code);
    assert_eq!(redemption.premium_days, 31);
    assert_eq!(redemption.code_uses, 1);
    assert_eq!(redemption.code_max_uses, 1);
    assert_eq!(redemption.redeemed_codes_count, 1);
    assert!(redemption.premium_expires_at.is_some());

    let response = server
        .get(&format!("/api/premium/server/{guild}"))
        .await
        .unwrap();
    let status: GuildStatus = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(status.premium_active);
    assert_eq!(status.days_remaining, 31);
    assert_eq!(status.premium_role_id, Some(role.to_string()));
    assert_eq!(status.redeemed_codes_count, 1);
    assert_eq!(status.guild_id, guild.to_string());
    assert_eq!(status.premium_expires_at, redemption.premium_expires_at);

    let response = server.get("/api/premium/servers").await.unwrap();
    let servers: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(servers["count"], 1);
}

#[tokio::test]
async fn test_redeem_rejections() {
    let server = TestServer::start().await.unwrap();
    let (guild, other_guild, role) = (unique_snowflake(), unique_snowflake(), unique_snowflake());
    server.directory.add_role(guild, role);
    server.directory.add_role(other_guild, role);
    let code = create_code(&server, 31, 1).await;
    let path = format!("/api/admin/guilds/{guild}/redeem");

    let response = server
        .post_admin(&path, &Redeem::new("MISSING-CODE", role))
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_CODE")
        .await
        .unwrap();

    // Role the guild does not have
    let response = server
        .post_admin(&path, &Redeem::new(&code, unique_snowflake()))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "UNKNOWN_ROLE")
        .await
        .unwrap();

    let response = server.post_admin(&path, &Redeem::new(&code, role)).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // Single-use code is spent
    let response = server
        .post_admin(
            &format!("/api/admin/guilds/{other_guild}/redeem"),
            &Redeem::new(&code, role),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "CODE_EXHAUSTED")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_same_guild_cannot_redeem_twice() {
    let server = TestServer::start().await.unwrap();
    let (guild, role) = (unique_snowflake(), unique_snowflake());
    server.directory.add_role(guild, role);
    let code = create_code(&server, 31, 5).await;
    let path = format!("/api/admin/guilds/{guild}/redeem");

    let response = server.post_admin(&path, &Redeem::new(&code, role)).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.post_admin(&path, &Redeem::new(&code, role)).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "CODE_ALREADY_REDEEMED")
        .await
        .unwrap();

    let response = server.get(&format!("/api/codes/{code}")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["currentUses"], 1);
}

#[tokio::test]
async fn test_new_redemption_resets_expiry() {
    let server = TestServer::start().await.unwrap();
    let (guild, role) = (unique_snowflake(), unique_snowflake());
    server.directory.add_role(guild, role);
    let first = create_code(&server, 31, 1).await;
    let second = create_code(&server, 7, 1).await;
    let path = format!("/api/admin/guilds/{guild}/redeem");

    server.post_admin(&path, &Redeem::new(&first, role)).await.unwrap();
    server.clock.advance(Duration::days(10));
    let response = server.post_admin(&path, &Redeem::new(&second, role)).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get(&format!("/api/premium/server/{guild}"))
        .await
        .unwrap();
    let status: GuildStatus = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(status.days_remaining, 7);
    assert_eq!(status.redeemed_codes_count, 2);
}

#[tokio::test]
async fn test_deactivated_code_cannot_be_redeemed() {
    let server = TestServer::start().await.unwrap();
    let (guild, role) = (unique_snowflake(), unique_snowflake());
    server.directory.add_role(guild, role);
    let code = create_code(&server, 31, 3).await;

    let response = server
        .post_admin(&format!("/api/admin/codes/{code}/deactivate"), &json!({}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["code"]["isActive"], false);

    let response = server
        .post_admin(
            &format!("/api/admin/guilds/{guild}/redeem"),
            &Redeem::new(&code, role),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "CODE_INACTIVE")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unknown_guild_status() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .get(&format!("/api/premium/server/{}", unique_snowflake()))
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_GUILD")
        .await
        .unwrap();

    let response = server.get("/api/premium/server/abc").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Expiry Reconciler Tests
// ============================================================================

#[tokio::test]
async fn test_reconcile_revokes_and_deletes_expired() {
    let server = TestServer::start().await.unwrap();
    let (expiring, lasting, role) = (unique_snowflake(), unique_snowflake(), unique_snowflake());
    server.directory.add_role(expiring, role);
    server.directory.add_role(lasting, role);

    let short = create_code(&server, 7, 1).await;
    let long = create_code(&server, 31, 1).await;
    server
        .post_admin(
            &format!("/api/admin/guilds/{expiring}/redeem"),
            &Redeem::new(&short, role),
        )
        .await
        .unwrap();
    server
        .post_admin(
            &format!("/api/admin/guilds/{lasting}/redeem"),
            &Redeem::new(&long, role),
        )
        .await
        .unwrap();

    server.clock.advance(Duration::days(8));

    let response = server
        .post_admin("/api/admin/reconcile", &json!({}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let report = &body["report"];
    assert_eq!(report["examined"], 1);
    assert_eq!(report["revokedMembers"], 1);
    assert_eq!(report["deleted"], 1);
    assert_eq!(report["revocationFailures"], 0);

    assert_eq!(server.directory.revocations(), vec![(expiring, role)]);

    let response = server
        .get(&format!("/api/premium/server/{expiring}"))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .get(&format!("/api/premium/server/{lasting}"))
        .await
        .unwrap();
    let status: GuildStatus = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(status.premium_active);

    // A second sweep finds nothing
    let response = server
        .post_admin("/api/admin/reconcile", &json!({}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["report"]["examined"], 0);
}
