/**
 * Messaging
 *
 * Direct and group messages. Every message belongs to exactly one thread.
 * A group send fans out into one stored record per recipient, all sharing a
 * freshly generated group id and thread id; a direct send produces a single
 * record with its own new thread id.
 *
 * Replies recover the subject (prefixed "Re: ") and group membership from
 * any existing message in the thread, then re-run the fan-out rule: group
 * replies go to the supplied recipients, 1:1 replies go back to the
 * original sender.
 */

pub mod handlers;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::Identity;

pub use store::{MemMessageStore, MessageFilter, MessageStore, PgMessageStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    /// Display snapshot of the sender taken at send time
    pub sender_name: String,
    pub recipient_id: Option<Uuid>,
    pub subject: String,
    pub body: String,
    pub read: bool,
    pub is_group: bool,
    pub group_id: Option<Uuid>,
    pub group_name: Option<String>,
    pub thread_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Whether `user` is a party to this message.
    pub fn involves(&self, user: Uuid) -> bool {
        self.sender_id == user || self.recipient_id == Some(user)
    }
}

/// Send request.
#[derive(Debug, Deserialize)]
pub struct OutgoingMessage {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub recipients: Vec<Uuid>,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub group_name: Option<String>,
}

/// Reply request; `recipients` is only consulted for group threads.
#[derive(Debug, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub recipients: Vec<Uuid>,
}

/// A group conversation derived from the stored group messages.
#[derive(Debug, Clone, Serialize)]
pub struct MessageGroup {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub members: Vec<Uuid>,
}

fn build(
    sender: &Identity,
    subject: &str,
    body: &str,
    recipient: Option<Uuid>,
    is_group: bool,
    group_id: Option<Uuid>,
    group_name: Option<String>,
    thread_id: Uuid,
    created_at: DateTime<Utc>,
) -> Message {
    Message {
        id: Uuid::new_v4(),
        sender_id: sender.id,
        sender_name: sender.display_label(),
        recipient_id: recipient,
        subject: subject.to_string(),
        body: body.to_string(),
        read: false,
        is_group,
        group_id,
        group_name,
        thread_id,
        created_at,
    }
}

/// Fan a new send out into stored records.
///
/// Group sends with at least one recipient produce one record per recipient
/// sharing one new group id and thread id. Anything else produces exactly
/// one record addressed to the first recipient (if any) with a fresh
/// thread id.
pub fn fan_out(sender: &Identity, outgoing: &OutgoingMessage) -> Vec<Message> {
    let now = Utc::now();
    let thread_id = Uuid::new_v4();

    if outgoing.is_group && !outgoing.recipients.is_empty() {
        let group_id = Uuid::new_v4();
        outgoing
            .recipients
            .iter()
            .map(|recipient| {
                build(
                    sender,
                    &outgoing.subject,
                    &outgoing.body,
                    Some(*recipient),
                    true,
                    Some(group_id),
                    outgoing.group_name.clone(),
                    thread_id,
                    now,
                )
            })
            .collect()
    } else {
        vec![build(
            sender,
            &outgoing.subject,
            &outgoing.body,
            outgoing.recipients.first().copied(),
            false,
            None,
            None,
            thread_id,
            now,
        )]
    }
}

/// Fan a reply out into stored records, reusing the thread's subject and
/// group membership. For 1:1 threads the reply is routed to the original
/// sender regardless of the supplied recipients.
pub fn fan_out_reply(
    sender: &Identity,
    original: &Message,
    reply: &ReplyMessage,
) -> Vec<Message> {
    let now = Utc::now();
    let subject = format!("Re: {}", original.subject);

    let recipients: Vec<Uuid> = if original.is_group {
        reply.recipients.clone()
    } else {
        vec![original.sender_id]
    };

    recipients
        .iter()
        .map(|recipient| {
            build(
                sender,
                &subject,
                &reply.body,
                Some(*recipient),
                original.is_group,
                original.group_id,
                original.group_name.clone(),
                original.thread_id,
                now,
            )
        })
        .collect()
}

/// Derive the group conversations `user` participates in from their group
/// messages. Member lists collect the counterparties seen per group.
pub fn fold_groups(user: Uuid, messages: &[Message]) -> Vec<MessageGroup> {
    let mut groups: Vec<MessageGroup> = Vec::new();

    for msg in messages {
        let Some(group_id) = msg.group_id.filter(|_| msg.is_group && msg.involves(user)) else {
            continue;
        };

        let group = match groups.iter_mut().find(|g| g.id == group_id) {
            Some(group) => group,
            None => {
                groups.push(MessageGroup {
                    id: group_id,
                    name: msg
                        .group_name
                        .clone()
                        .unwrap_or_else(|| "Group Chat".to_string()),
                    created_at: msg.created_at,
                    members: Vec::new(),
                });
                groups.last_mut().expect("just pushed")
            }
        };

        let member = if msg.sender_id == user {
            msg.recipient_id
        } else {
            Some(msg.sender_id)
        };
        if let Some(member) = member {
            if !group.members.contains(&member) {
                group.members.push(member);
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::users::Role;

    fn sender() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "alex@opsdesk.example".to_string(),
            role: Role::Employee,
        }
    }

    fn group_send(recipients: Vec<Uuid>) -> OutgoingMessage {
        OutgoingMessage {
            subject: "Quarterly review".to_string(),
            body: "Draft attached".to_string(),
            recipients,
            is_group: true,
            group_name: Some("Review crew".to_string()),
        }
    }

    #[test]
    fn test_group_fan_out_shares_group_and_thread() {
        let recipients = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let messages = fan_out(&sender(), &group_send(recipients.clone()));

        assert_eq!(messages.len(), 3);
        let group_id = messages[0].group_id.expect("group id set");
        let thread_id = messages[0].thread_id;
        for (msg, recipient) in messages.iter().zip(&recipients) {
            assert_eq!(msg.group_id, Some(group_id));
            assert_eq!(msg.thread_id, thread_id);
            assert_eq!(msg.recipient_id, Some(*recipient));
            assert!(msg.is_group);
            assert!(!msg.read);
        }
    }

    #[test]
    fn test_direct_send_is_single_record() {
        let recipient = Uuid::new_v4();
        let outgoing = OutgoingMessage {
            subject: "Hi".to_string(),
            body: "One-on-one".to_string(),
            recipients: vec![recipient],
            is_group: false,
            group_name: None,
        };

        let messages = fan_out(&sender(), &outgoing);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].recipient_id, Some(recipient));
        assert!(messages[0].group_id.is_none());
        assert!(!messages[0].is_group);
    }

    #[test]
    fn test_reply_to_direct_thread_targets_original_sender() {
        let original_sender = sender();
        let outgoing = OutgoingMessage {
            subject: "Kickoff".to_string(),
            body: "Can we meet?".to_string(),
            recipients: vec![Uuid::new_v4()],
            is_group: false,
            group_name: None,
        };
        let original = fan_out(&original_sender, &outgoing).remove(0);

        let replier = sender();
        let reply = ReplyMessage {
            body: "Sure".to_string(),
            // Supplied recipients are ignored for 1:1 threads
            recipients: vec![Uuid::new_v4()],
        };
        let replies = fan_out_reply(&replier, &original, &reply);

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].recipient_id, Some(original_sender.id));
        assert_eq!(replies[0].thread_id, original.thread_id);
        assert_eq!(replies[0].subject, "Re: Kickoff");
    }

    #[test]
    fn test_reply_to_group_thread_keeps_group_markers() {
        let original = fan_out(&sender(), &group_send(vec![Uuid::new_v4(), Uuid::new_v4()]));
        let first = &original[0];

        let reply_recipients = vec![Uuid::new_v4(), Uuid::new_v4()];
        let replies = fan_out_reply(
            &sender(),
            first,
            &ReplyMessage {
                body: "+1".to_string(),
                recipients: reply_recipients.clone(),
            },
        );

        assert_eq!(replies.len(), 2);
        for (msg, recipient) in replies.iter().zip(&reply_recipients) {
            assert_eq!(msg.group_id, first.group_id);
            assert_eq!(msg.thread_id, first.thread_id);
            assert_eq!(msg.group_name, first.group_name);
            assert_eq!(msg.recipient_id, Some(*recipient));
        }
    }

    #[test]
    fn test_fold_groups_collects_counterparties() {
        let me = sender();
        let others = vec![Uuid::new_v4(), Uuid::new_v4()];
        let messages = fan_out(&me, &group_send(others.clone()));

        let groups = fold_groups(me.id, &messages);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Review crew");
        assert_eq!(groups[0].members, others);

        // A direct message contributes nothing
        let direct = fan_out(
            &me,
            &OutgoingMessage {
                subject: String::new(),
                body: String::new(),
                recipients: vec![others[0]],
                is_group: false,
                group_name: None,
            },
        );
        assert!(fold_groups(me.id, &direct).is_empty());
    }
}
