
use uuid::Uuid;

use folio_api::{
    entities::contact_message::ContactForm, errors::AppError, use_cases::contact::ContactHandler,
};
use test_utils::MemoryContactRepo;

fn form(name: &str, email: &str, message: &str) -> ContactForm {
    ContactForm {
        name: name.into(),
        email: email.into(),
        subject: None,
        message: message.into(),
    }
}

async fn inbox_with(count: usize) -> (ContactHandler<MemoryContactRepo>, Vec<Uuid>) {
    let handler = ContactHandler::new(MemoryContactRepo::default(), 500);
    let mut ids = Vec::new();
    for n in 0..count {
        let received = handler
            .submit(form("Visitor", &format!("visitor{n}@example.com"), "Hello from the site"))
            .await
            .unwrap();
        ids.push(received.id);
    }
    (handler, ids)
}

#[actix_rt::test]
async fn submissions_are_stored_unread_with_a_lowercased_email() {
    let (handler, _) = inbox_with(0).await;

    let received = handler
        .submit(form("Grace", "Grace@Example.COM", "Are you available in May?"))
        .await
        .unwrap();

    let inbox = handler.list().await.unwrap();
    assert_eq!(inbox.total, 1);
    assert_eq!(inbox.unread, 1);
    assert_eq!(inbox.messages[0].id, received.id);
    assert_eq!(inbox.messages[0].email, "grace@example.com");
    assert!(!inbox.messages[0].read);
}

#[actix_rt::test]
async fn invalid_submissions_are_not_stored() {
    let (handler, _) = inbox_with(0).await;

    let err = handler.submit(form("G", "not-an-email", "hi")).await.unwrap_err();

    match err {
        AppError::ValidationError(fields) => {
            let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
            assert!(names.contains(&"name"));
            assert!(names.contains(&"email"));
            assert!(names.contains(&"message"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(handler.list().await.unwrap().total, 0);
}

#[actix_rt::test]
async fn marking_read_updates_the_unread_count() {
    let (handler, ids) = inbox_with(3).await;

    let message = handler.mark_read(&ids[1], true).await.unwrap();
    assert!(message.read);

    let inbox = handler.list().await.unwrap();
    assert_eq!((inbox.total, inbox.unread), (3, 2));

    handler.mark_read(&ids[1], false).await.unwrap();
    assert_eq!(handler.list().await.unwrap().unread, 3);
}

#[actix_rt::test]
async fn deleting_removes_only_that_message() {
    let (handler, ids) = inbox_with(2).await;

    handler.delete(&ids[0]).await.unwrap();

    let inbox = handler.list().await.unwrap();
    assert_eq!(inbox.total, 1);
    assert_eq!(inbox.messages[0].id, ids[1]);
}

#[actix_rt::test]
async fn unknown_messages_are_not_found() {
    let (handler, _) = inbox_with(1).await;
    let missing = Uuid::new_v4();

    assert!(handler.mark_read(&missing, true).await.unwrap_err().is_not_found());
    assert!(handler.delete(&missing).await.unwrap_err().is_not_found());
    assert_eq!(handler.list().await.unwrap().total, 1);
}

#[actix_rt::test]
async fn the_inbox_list_is_capped_but_counts_everything() {
    let handler = ContactHandler::new(MemoryContactRepo::default(), 2);
    for n in 0..3 {
        handler
            .submit(form("Visitor", &format!("v{n}@example.com"), "Hello from the site"))
            .await
            .unwrap();
    }

    let inbox = handler.list().await.unwrap();
    assert_eq!(inbox.messages.len(), 2);
    assert_eq!(inbox.total, 3);
}
