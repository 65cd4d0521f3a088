mod common;

use commerce_core::payload::{UserPatch, UserRolePatch};
use commerce_core::{NamePattern, Role};
use commerce_service::{ErrorCode, ServiceError};

#[tokio::test]
async fn password_is_hashed_and_verifiable() {
    let commerce = common::commerce().await;
    let identity = commerce.identity();
    let city = common::city(&commerce, "Antioquia", "Medellin").await;
    let role = common::role(&commerce, Role::Admin).await;

    let user = identity
        .create_user(common::new_user("agomez", "Ana", role, city))
        .await
        .unwrap();

    let stored = commerce
        .database()
        .users()
        .get_by_id(&user.id)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "correct horse");
    assert!(stored.password_hash.starts_with("$argon2"));

    assert!(identity.verify_password(&user.id, "correct horse").await.unwrap());
    assert!(!identity.verify_password(&user.id, "wrong").await.unwrap());
}

#[tokio::test]
async fn password_patch_rehashes_and_other_fields_merge() {
    let commerce = common::commerce().await;
    let identity = commerce.identity();
    let city = common::city(&commerce, "Antioquia", "Medellin").await;
    let role = common::role(&commerce, Role::User).await;
    let user = identity
        .create_user(common::new_user("lperez", "Luis", role, city))
        .await
        .unwrap();

    let updated = identity
        .update_user(
            &user.id,
            UserPatch {
                phone: Some("3109876543".to_string()),
                password: Some("new secret".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.phone, "3109876543");
    assert_eq!(updated.username, user.username);
    assert_eq!(updated.created_at, user.created_at);
    assert!(identity.verify_password(&user.id, "new secret").await.unwrap());
    assert!(!identity.verify_password(&user.id, "correct horse").await.unwrap());
}

#[tokio::test]
async fn duplicate_username_or_email_is_conflict() {
    let commerce = common::commerce().await;
    let identity = commerce.identity();
    let city = common::city(&commerce, "Antioquia", "Medellin").await;
    let role = common::role(&commerce, Role::User).await;
    identity
        .create_user(common::new_user("agomez", "Ana", role, city))
        .await
        .unwrap();

    let err = identity
        .create_user(common::new_user("agomez", "Other", role, city))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);

    let mut same_email = common::new_user("another", "Other", role, city);
    same_email.email = "agomez@example.com".to_string();
    let err = identity.create_user(same_email).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn invalid_payloads_and_parents_are_rejected() {
    let commerce = common::commerce().await;
    let identity = commerce.identity();
    let city = common::city(&commerce, "Antioquia", "Medellin").await;
    let role = common::role(&commerce, Role::User).await;

    let mut bad_email = common::new_user("x", "X", role, city);
    bad_email.email = "no-at-sign".to_string();
    let err = identity.create_user(bad_email).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let mut bad_phone = common::new_user("y", "Y", role, city);
    bad_phone.phone = "12345678901".to_string();
    assert_eq!(
        identity.create_user(bad_phone).await.unwrap_err().code(),
        ErrorCode::ValidationError
    );

    let err = identity
        .create_user(common::new_user("z", "Z", role, 999))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { ref entity, .. } if entity == "City"));

    let err = identity
        .create_user(common::new_user("w", "W", 999, city))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { ref entity, .. } if entity == "UserRole"));
}

#[tokio::test]
async fn user_searches() {
    let commerce = common::commerce().await;
    let identity = commerce.identity();
    let medellin = common::city(&commerce, "Antioquia", "Medellin").await;
    let bogota = common::city(&commerce, "Cundinamarca", "Bogota").await;
    let role = common::role(&commerce, Role::User).await;

    let ana = identity
        .create_user(common::new_user("ana", "Ana", role, medellin))
        .await
        .unwrap();
    let mut hanna = common::new_user("hanna", "Hanna", role, bogota);
    hanna.last_name = "Smith".to_string();
    let hanna = identity.create_user(hanna).await.unwrap();
    let luis = identity
        .create_user(common::new_user("luis", "Luis", role, bogota))
        .await
        .unwrap();

    let by_last = identity.users_by_last_name("SMITH").await.unwrap();
    assert_eq!(by_last, vec![hanna.clone()]);

    assert_eq!(identity.users_by_city_id(medellin).await.unwrap(), vec![ana.clone()]);
    assert_eq!(identity.users_by_city_name("Bogota").await.unwrap().len(), 2);
    assert_eq!(
        identity.users_by_department_name("Antioquia").await.unwrap(),
        vec![ana.clone()]
    );

    let contains = identity
        .users_by_first_name(&NamePattern::Contains("AN".to_string()))
        .await
        .unwrap();
    assert_eq!(contains.len(), 2);
    assert!(!contains.contains(&luis));

    let like = identity
        .users_by_first_name(&NamePattern::Like("l%".to_string()))
        .await
        .unwrap();
    assert_eq!(like, vec![luis]);

    let literal = identity
        .users_by_first_name(&NamePattern::Contains("%".to_string()))
        .await
        .unwrap();
    assert!(literal.is_empty());
}

#[tokio::test]
async fn name_searches_ignore_case_of_accented_letters() {
    let commerce = common::commerce().await;
    let identity = commerce.identity();
    let city = common::city(&commerce, "Antioquia", "Medellín").await;
    let role = common::role(&commerce, Role::User).await;

    let mut new = common::new_user("onunez", "Óscar", role, city);
    new.last_name = "Núñez".to_string();
    let oscar = identity.create_user(new).await.unwrap();

    assert_eq!(identity.users_by_last_name("NÚÑEZ").await.unwrap(), vec![oscar.clone()]);
    assert_eq!(
        identity
            .users_by_first_name(&NamePattern::Contains("ósc".to_string()))
            .await
            .unwrap(),
        vec![oscar.clone()]
    );

    let renamed = identity
        .update_user(
            &oscar.id,
            UserPatch {
                last_name: Some("Gómez".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(identity.users_by_last_name("GÓMEZ").await.unwrap(), vec![renamed]);
    assert!(identity.users_by_last_name("núñez").await.unwrap().is_empty());
}

#[tokio::test]
async fn role_crud_and_restricted_delete() {
    let commerce = common::commerce().await;
    let identity = commerce.identity();
    let city = common::city(&commerce, "Antioquia", "Medellin").await;
    let role = common::role(&commerce, Role::User).await;

    let changed = identity
        .update_role(
            role,
            UserRolePatch {
                role: Some(Role::Manager),
            },
        )
        .await
        .unwrap();
    assert_eq!(changed.role, Role::Manager);
    assert_eq!(identity.get_role(role).await.unwrap(), changed);

    identity
        .create_user(common::new_user("ana", "Ana", role, city))
        .await
        .unwrap();
    let err = identity.delete_role(role).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);

    let err = identity.get_role(999).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}
