use std::{ops::Deref, rc::Rc};

use taskdesk_client::{Client, RestTransport};

/// Shared handle to the REST client, compared by identity
#[derive(Clone, Debug)]
pub struct Api(Rc<Client<RestTransport>>);

impl Api {
    pub fn new(base: &str) -> Api {
        tracing::info!(%base, "using REST API");
        Api(Rc::new(Client::new(RestTransport::new(
            crate::CLIENT.clone(),
            base,
        ))))
    }
}

impl Deref for Api {
    type Target = Client<RestTransport>;

    fn deref(&self) -> &Client<RestTransport> {
        &self.0
    }
}

impl PartialEq for Api {
    fn eq(&self, other: &Api) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
