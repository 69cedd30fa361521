//! Test suite for the HCI link transport.


#[cfg(test)]
mod link_e2e;

#[cfg(test)]
mod props;
