//! The Chinook schema: entity definitions and the child-collection relation list.
//! Tables are ordered so that referenced tables come first.

use crate::config::types::*;

const ARTIST_FIELDS: &[FieldDef] = &[FieldDef::text("name", "Name", STRING_120)];

const GENRE_FIELDS: &[FieldDef] = &[FieldDef::text("name", "Name", STRING_120)];

const MEDIA_TYPE_FIELDS: &[FieldDef] = &[FieldDef::text("name", "Name", STRING_120)];

const ALBUM_FIELDS: &[FieldDef] = &[
    FieldDef::text("title", "Title", STRING_160),
    FieldDef::integer("artist_id", "ArtistId").references("artists", "ArtistId"),
];

const TRACK_FIELDS: &[FieldDef] = &[
    FieldDef::text("name", "Name", STRING_200),
    FieldDef::integer("album_id", "AlbumId")
        .optional()
        .references("albums", "AlbumId"),
    FieldDef::integer("media_type_id", "MediaTypeId")
        .non_negative()
        .references("media_types", "MediaTypeId"),
    FieldDef::integer("genre_id", "GenreId")
        .optional()
        .references("genres", "GenreId"),
    FieldDef::text("composer", "Composer", STRING_220).optional(),
    FieldDef::integer("milliseconds", "Milliseconds").non_negative(),
    FieldDef::integer("bytes", "Bytes").optional(),
    FieldDef::decimal("unit_price", "UnitPrice").at_most(10.0, 4),
];

const PLAYLIST_FIELDS: &[FieldDef] = &[FieldDef::text("name", "Name", STRING_120).optional()];

const PLAYLIST_TRACK_FIELDS: &[FieldDef] = &[
    FieldDef::integer("playlist_id", "PlaylistId").references("playlists", "PlaylistId"),
    FieldDef::integer("track_id", "TrackId").references("tracks", "TrackId"),
];

const EMPLOYEE_FIELDS: &[FieldDef] = &[
    FieldDef::text("last_name", "LastName", STRING_20),
    FieldDef::text("first_name", "FirstName", STRING_20),
    FieldDef::text("title", "Title", STRING_30).optional(),
    FieldDef::integer("reports_to", "ReportsTo")
        .optional()
        .references("employees", "EmployeeId"),
    FieldDef::datetime("birth_date", "BirthDate").optional(),
    FieldDef::datetime("hire_date", "HireDate").optional(),
    FieldDef::text("address", "Address", STRING_70).optional(),
    FieldDef::text("city", "City", STRING_40).optional(),
    FieldDef::text("state", "State", STRING_40).optional(),
    FieldDef::text("country", "Country", STRING_40).optional(),
    FieldDef::text("postal_code", "PostalCode", STRING_10).optional(),
    FieldDef::text("phone", "Phone", STRING_24).optional(),
    FieldDef::text("fax", "Fax", STRING_24).optional(),
    FieldDef::text("email", "Email", STRING_60).optional(),
];

const CUSTOMER_FIELDS: &[FieldDef] = &[
    FieldDef::text("first_name", "FirstName", STRING_40),
    FieldDef::text("last_name", "LastName", STRING_20),
    FieldDef::text("company", "Company", STRING_80).optional(),
    FieldDef::text("address", "Address", STRING_70).optional(),
    FieldDef::text("city", "City", STRING_40).optional(),
    FieldDef::text("state", "State", STRING_40).optional(),
    FieldDef::text("country", "Country", STRING_40).optional(),
    FieldDef::text("postal_code", "PostalCode", STRING_10).optional(),
    FieldDef::text("phone", "Phone", STRING_24).optional(),
    FieldDef::text("fax", "Fax", STRING_24).optional(),
    FieldDef::text("email", "Email", STRING_60),
    FieldDef::integer("support_rep_id", "SupportRepId")
        .optional()
        .references("employees", "EmployeeId"),
];

const INVOICE_FIELDS: &[FieldDef] = &[
    FieldDef::integer("customer_id", "CustomerId").references("customers", "CustomerId"),
    FieldDef::datetime("invoice_date", "InvoiceDate"),
    FieldDef::text("billing_address", "BillingAddress", STRING_70).optional(),
    FieldDef::text("billing_city", "BillingCity", STRING_40).optional(),
    FieldDef::text("billing_state", "BillingState", STRING_40).optional(),
    FieldDef::text("billing_country", "BillingCountry", STRING_40).optional(),
    FieldDef::text("billing_postal_code", "BillingPostalCode", STRING_10).optional(),
    FieldDef::decimal("total", "Total"),
];

const INVOICE_ITEM_FIELDS: &[FieldDef] = &[
    FieldDef::integer("invoice_id", "InvoiceId")
        .non_negative()
        .references("invoices", "InvoiceId"),
    FieldDef::integer("track_id", "TrackId")
        .non_negative()
        .references("tracks", "TrackId"),
    FieldDef::decimal("unit_price", "UnitPrice"),
    FieldDef::integer("quantity", "Quantity").non_negative(),
];

pub static ENTITIES: &[EntityDef] = &[
    EntityDef {
        name: "Artist",
        table: "artists",
        path: Some("artists"),
        primary_key: PrimaryKey::Single("ArtistId"),
        fields: ARTIST_FIELDS,
        indexes: &[],
        operations: Operation::ALL,
    },
    EntityDef {
        name: "Genre",
        table: "genres",
        path: Some("genres"),
        primary_key: PrimaryKey::Single("GenreId"),
        fields: GENRE_FIELDS,
        indexes: &[],
        operations: Operation::ALL,
    },
    EntityDef {
        name: "MediaType",
        table: "media_types",
        path: Some("media_types"),
        primary_key: PrimaryKey::Single("MediaTypeId"),
        fields: MEDIA_TYPE_FIELDS,
        indexes: &[],
        operations: Operation::ALL,
    },
    EntityDef {
        name: "Album",
        table: "albums",
        path: Some("albums"),
        primary_key: PrimaryKey::Single("AlbumId"),
        fields: ALBUM_FIELDS,
        indexes: &[IndexDef {
            name: "IFK_AlbumArtistId",
            columns: &["ArtistId"],
        }],
        operations: Operation::ALL,
    },
    EntityDef {
        name: "Track",
        table: "tracks",
        path: Some("tracks"),
        primary_key: PrimaryKey::Single("TrackId"),
        fields: TRACK_FIELDS,
        indexes: &[
            IndexDef {
                name: "IFK_TrackAlbumId",
                columns: &["AlbumId"],
            },
            IndexDef {
                name: "IFK_TrackGenreId",
                columns: &["GenreId"],
            },
            IndexDef {
                name: "IFK_TrackMediaTypeId",
                columns: &["MediaTypeId"],
            },
        ],
        operations: Operation::ALL,
    },
    EntityDef {
        name: "Playlist",
        table: "playlists",
        path: Some("playlists"),
        primary_key: PrimaryKey::Single("PlaylistId"),
        fields: PLAYLIST_FIELDS,
        indexes: &[],
        operations: Operation::ALL,
    },
    EntityDef {
        name: "PlaylistTrack",
        table: "playlist_track",
        path: None,
        primary_key: PrimaryKey::Composite(&["PlaylistId", "TrackId"]),
        fields: PLAYLIST_TRACK_FIELDS,
        indexes: &[IndexDef {
            name: "IFK_PlaylistTrackTrackId",
            columns: &["TrackId"],
        }],
        operations: &[],
    },
    EntityDef {
        name: "Employee",
        table: "employees",
        path: Some("employees"),
        primary_key: PrimaryKey::Single("EmployeeId"),
        fields: EMPLOYEE_FIELDS,
        indexes: &[IndexDef {
            name: "IFK_EmployeeReportsTo",
            columns: &["ReportsTo"],
        }],
        operations: Operation::ALL,
    },
    EntityDef {
        name: "Customer",
        table: "customers",
        path: Some("customers"),
        primary_key: PrimaryKey::Single("CustomerId"),
        fields: CUSTOMER_FIELDS,
        indexes: &[IndexDef {
            name: "IFK_CustomerSupportRepId",
            columns: &["SupportRepId"],
        }],
        operations: Operation::ALL,
    },
    EntityDef {
        name: "Invoice",
        table: "invoices",
        path: Some("invoices"),
        primary_key: PrimaryKey::Single("InvoiceId"),
        fields: INVOICE_FIELDS,
        indexes: &[IndexDef {
            name: "IFK_InvoiceCustomerId",
            columns: &["CustomerId"],
        }],
        operations: Operation::ALL,
    },
    EntityDef {
        name: "InvoiceItem",
        table: "invoice_items",
        path: Some("invoice_items"),
        primary_key: PrimaryKey::Single("InvoiceLineId"),
        fields: INVOICE_ITEM_FIELDS,
        indexes: &[
            IndexDef {
                name: "IFK_InvoiceLineInvoiceId",
                columns: &["InvoiceId"],
            },
            IndexDef {
                name: "IFK_InvoiceLineTrackId",
                columns: &["TrackId"],
            },
        ],
        operations: Operation::ALL,
    },
];

pub static RELATIONS: &[RelationDef] = &[
    RelationDef {
        parent: "artists",
        child: "albums",
        segment: "albums",
        link: Link::ForeignKey("ArtistId"),
    },
    RelationDef {
        parent: "albums",
        child: "tracks",
        segment: "tracks",
        link: Link::ForeignKey("AlbumId"),
    },
    RelationDef {
        parent: "tracks",
        child: "invoice_items",
        segment: "invoice_items",
        link: Link::ForeignKey("TrackId"),
    },
    RelationDef {
        parent: "tracks",
        child: "playlists",
        segment: "playlists",
        link: Link::Through {
            table: "playlist_track",
            parent_column: "TrackId",
            child_column: "PlaylistId",
        },
    },
    RelationDef {
        parent: "genres",
        child: "tracks",
        segment: "tracks",
        link: Link::ForeignKey("GenreId"),
    },
    RelationDef {
        parent: "media_types",
        child: "tracks",
        segment: "tracks",
        link: Link::ForeignKey("MediaTypeId"),
    },
    RelationDef {
        parent: "playlists",
        child: "tracks",
        segment: "tracks",
        link: Link::Through {
            table: "playlist_track",
            parent_column: "PlaylistId",
            child_column: "TrackId",
        },
    },
    RelationDef {
        parent: "invoices",
        child: "invoice_items",
        segment: "invoice_items",
        link: Link::ForeignKey("InvoiceId"),
    },
    RelationDef {
        parent: "customers",
        child: "invoices",
        segment: "invoices",
        link: Link::ForeignKey("CustomerId"),
    },
    RelationDef {
        parent: "employees",
        child: "customers",
        segment: "customers",
        link: Link::ForeignKey("SupportRepId"),
    },
    RelationDef {
        parent: "employees",
        child: "employees",
        segment: "reports",
        link: Link::ForeignKey("ReportsTo"),
    },
];
