use std::sync::Arc;

use actix_web::web;

use crate::modules::auth::application::use_cases::login_user::ILoginUserUseCase;
use crate::modules::auth::application::use_cases::sign_up_user::ISignUpUserUseCase;
use crate::modules::contact::application::use_cases::send_contact_message::ISendContactMessageUseCase;
use crate::modules::media::application::use_cases::create_upload_url::ICreateUploadUrlUseCase;
use crate::modules::portfolio::application::{DashboardService, PortfolioManagers};
use crate::modules::section::application::SectionContentService;
use crate::modules::store::adapter::outgoing::{InMemoryDocumentStore, NotificationLog};
use crate::modules::store::application::ports::outgoing::{DocumentStore, Notifier};
use crate::modules::store::application::RequestTracker;
use crate::tests::support::stubs::*;
use crate::AppState;

/// Real managers over an in-memory store, stubbed use cases.
pub struct TestAppStateBuilder {
    store: Arc<dyn DocumentStore>,
    login_user: Arc<dyn ILoginUserUseCase>,
    sign_up_user: Arc<dyn ISignUpUserUseCase>,
    send_contact_message: Arc<dyn ISendContactMessageUseCase>,
    create_upload_url: Arc<dyn ICreateUploadUrlUseCase>,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            store: Arc::new(InMemoryDocumentStore::new()),
            login_user: Arc::new(StubLoginUserUseCase),
            sign_up_user: Arc::new(StubSignUpUserUseCase),
            send_contact_message: Arc::new(StubSendContactMessageUseCase),
            create_upload_url: Arc::new(StubCreateUploadUrlUseCase),
        }
    }
}

impl TestAppStateBuilder {
    pub fn with_store<S: DocumentStore + 'static>(mut self, store: Arc<S>) -> Self {
        self.store = store;
        self
    }

    pub fn with_login(mut self, uc: impl ILoginUserUseCase + 'static) -> Self {
        self.login_user = Arc::new(uc);
        self
    }

    pub fn with_sign_up(mut self, uc: impl ISignUpUserUseCase + 'static) -> Self {
        self.sign_up_user = Arc::new(uc);
        self
    }

    pub fn with_contact(mut self, uc: impl ISendContactMessageUseCase + 'static) -> Self {
        self.send_contact_message = Arc::new(uc);
        self
    }

    pub fn with_upload_url(mut self, uc: impl ICreateUploadUrlUseCase + 'static) -> Self {
        self.create_upload_url = Arc::new(uc);
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        let notifications = Arc::new(NotificationLog::default());
        let notifier: Arc<dyn Notifier> = notifications.clone();
        let requests = RequestTracker::new();

        let managers = Arc::new(PortfolioManagers::new(
            Arc::clone(&self.store),
            Arc::clone(&notifier),
            Arc::clone(&requests),
        ));

        web::Data::new(AppState {
            dashboard: Arc::new(DashboardService::new(
                Arc::clone(&managers),
                Arc::clone(&notifier),
            )),
            sections: Arc::new(SectionContentService::new(
                Arc::clone(&self.store),
                notifier,
                Arc::clone(&requests),
            )),
            store: self.store,
            notifications,
            requests,
            managers,
            login_user_use_case: self.login_user,
            sign_up_user_use_case: self.sign_up_user,
            send_contact_message_use_case: self.send_contact_message,
            create_upload_url_use_case: self.create_upload_url,
        })
    }
}
