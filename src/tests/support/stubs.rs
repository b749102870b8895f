//! Use cases that fail loudly, for tests that never reach them.

use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::{
    AuthSession, LoginCommand, SignUpCommand,
};
use crate::modules::auth::application::use_cases::login_user::{ILoginUserUseCase, LoginError};
use crate::modules::auth::application::use_cases::sign_up_user::{
    ISignUpUserUseCase, SignUpError,
};
use crate::modules::contact::application::domain::ContactMessage;
use crate::modules::contact::application::use_cases::send_contact_message::{
    ISendContactMessageUseCase, SendContactError,
};
use crate::modules::media::application::domain::UploadForm;
use crate::modules::media::application::ports::outgoing::SignUrlError;
use crate::modules::media::application::use_cases::create_upload_url::{
    CreateUploadUrlError, ICreateUploadUrlUseCase, UploadUrls,
};

pub struct StubLoginUserUseCase;

#[async_trait]
impl ILoginUserUseCase for StubLoginUserUseCase {
    async fn execute(&self, _command: LoginCommand) -> Result<AuthSession, LoginError> {
        Err(LoginError::InvalidCredentials)
    }
}

pub struct StubSignUpUserUseCase;

#[async_trait]
impl ISignUpUserUseCase for StubSignUpUserUseCase {
    async fn execute(&self, _command: SignUpCommand) -> Result<AuthSession, SignUpError> {
        Err(SignUpError::RepositoryError("not used in this test".into()))
    }
}

pub struct StubSendContactMessageUseCase;

#[async_trait]
impl ISendContactMessageUseCase for StubSendContactMessageUseCase {
    async fn execute(&self, _message: ContactMessage) -> Result<(), SendContactError> {
        Err(SendContactError::Unavailable)
    }
}

pub struct StubCreateUploadUrlUseCase;

#[async_trait]
impl ICreateUploadUrlUseCase for StubCreateUploadUrlUseCase {
    async fn execute(&self, _form: UploadForm) -> Result<UploadUrls, CreateUploadUrlError> {
        Err(CreateUploadUrlError::Storage(SignUrlError::Infrastructure))
    }
}
